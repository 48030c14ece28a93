//! Migration to create the production_plans table.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductionPlans::Table)
                    .if_not_exists()
                    .col(string(ProductionPlans::Id).primary_key())
                    .col(string_null(ProductionPlans::ClientId))
                    .col(string(ProductionPlans::Crop).not_null())
                    .col(string_null(ProductionPlans::Plot))
                    .col(big_integer_null(ProductionPlans::PlannedYieldKg))
                    .col(string_null(ProductionPlans::Season))
                    .col(timestamp_with_time_zone(ProductionPlans::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ProductionPlans::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_production_plans_client_id")
                    .table(ProductionPlans::Table)
                    .col(ProductionPlans::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_production_plans_season")
                    .table(ProductionPlans::Table)
                    .col(ProductionPlans::Season)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_production_plans_created_at")
                    .table(ProductionPlans::Table)
                    .col(ProductionPlans::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductionPlans::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ProductionPlans {
    Table,
    Id,
    ClientId,
    Crop,
    Plot,
    PlannedYieldKg,
    Season,
    CreatedAt,
    UpdatedAt,
}
