//! Initial migration to create the clients table.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Clients::Table)
                    .if_not_exists()
                    .col(string(Clients::Id).primary_key())
                    .col(string(Clients::Name).not_null())
                    .col(string_null(Clients::Contact))
                    .col(string_null(Clients::Phone))
                    .col(string_null(Clients::Region))
                    .col(string(Clients::Channel).not_null().default("b2b"))
                    .col(timestamp_with_time_zone(Clients::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Clients::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        // Listing filters by region and channel.
        manager
            .create_index(
                Index::create()
                    .name("idx_clients_region")
                    .table(Clients::Table)
                    .col(Clients::Region)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_clients_channel")
                    .table(Clients::Table)
                    .col(Clients::Channel)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_clients_created_at")
                    .table(Clients::Table)
                    .col(Clients::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Clients::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Clients {
    Table,
    Id,
    Name,
    Contact,
    Phone,
    Region,
    Channel,
    CreatedAt,
    UpdatedAt,
}
