//! Migration to create the messages table.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .col(string(Messages::Id).primary_key())
                    .col(string(Messages::ClientId).not_null())
                    .col(string(Messages::Title).not_null())
                    .col(text(Messages::Body).not_null())
                    .col(boolean(Messages::Read).not_null().default(false))
                    .col(timestamp_with_time_zone(Messages::CreatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        // Unread-per-client is the hot query.
        manager
            .create_index(
                Index::create()
                    .name("idx_messages_client_id_read")
                    .table(Messages::Table)
                    .col(Messages::ClientId)
                    .col(Messages::Read)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Messages::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Messages {
    Table,
    Id,
    ClientId,
    Title,
    Body,
    Read,
    CreatedAt,
}
