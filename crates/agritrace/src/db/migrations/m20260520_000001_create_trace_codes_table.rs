//! Migration to create the trace_codes table.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TraceCodes::Table)
                    .if_not_exists()
                    .col(string(TraceCodes::Code).primary_key())
                    .col(string(TraceCodes::PlanId).not_null())
                    .col(string_null(TraceCodes::OrderId))
                    .col(timestamp_with_time_zone(TraceCodes::CreatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trace_codes_plan_id")
                    .table(TraceCodes::Table)
                    .col(TraceCodes::PlanId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TraceCodes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TraceCodes {
    Table,
    Code,
    PlanId,
    OrderId,
    CreatedAt,
}
