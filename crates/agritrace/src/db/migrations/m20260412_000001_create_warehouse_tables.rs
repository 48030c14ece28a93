//! Migration to create the warehouse_jobs and processing_segments
//! tables.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WarehouseJobs::Table)
                    .if_not_exists()
                    .col(string(WarehouseJobs::Id).primary_key())
                    .col(string_null(WarehouseJobs::OrderId))
                    .col(string_null(WarehouseJobs::PlanId))
                    .col(string(WarehouseJobs::ProductName).not_null())
                    .col(string_null(WarehouseJobs::BatchNo))
                    .col(string(WarehouseJobs::Status).not_null().default("preparing"))
                    .col(timestamp_with_time_zone(WarehouseJobs::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(WarehouseJobs::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_warehouse_jobs_status")
                    .table(WarehouseJobs::Table)
                    .col(WarehouseJobs::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_warehouse_jobs_order_id")
                    .table(WarehouseJobs::Table)
                    .col(WarehouseJobs::OrderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_warehouse_jobs_plan_id")
                    .table(WarehouseJobs::Table)
                    .col(WarehouseJobs::PlanId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProcessingSegments::Table)
                    .if_not_exists()
                    .col(string(ProcessingSegments::Id).primary_key())
                    .col(string(ProcessingSegments::JobId).not_null())
                    .col(string(ProcessingSegments::Kind).not_null())
                    .col(boolean(ProcessingSegments::Completed).not_null().default(false))
                    .col(string_null(ProcessingSegments::Operator))
                    .col(timestamp_with_time_zone_null(ProcessingSegments::OperatedAt))
                    .col(text_null(ProcessingSegments::Media))
                    .col(text_null(ProcessingSegments::Remarks))
                    .col(timestamp_with_time_zone(ProcessingSegments::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ProcessingSegments::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_processing_segments_job_id")
                            .from(ProcessingSegments::Table, ProcessingSegments::JobId)
                            .to(WarehouseJobs::Table, WarehouseJobs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One segment per kind per job; status derivation depends on it.
        manager
            .create_index(
                Index::create()
                    .name("idx_processing_segments_job_kind")
                    .table(ProcessingSegments::Table)
                    .col(ProcessingSegments::JobId)
                    .col(ProcessingSegments::Kind)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProcessingSegments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WarehouseJobs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum WarehouseJobs {
    Table,
    Id,
    OrderId,
    PlanId,
    ProductName,
    BatchNo,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProcessingSegments {
    Table,
    Id,
    JobId,
    Kind,
    Completed,
    Operator,
    OperatedAt,
    Media,
    Remarks,
    CreatedAt,
    UpdatedAt,
}
