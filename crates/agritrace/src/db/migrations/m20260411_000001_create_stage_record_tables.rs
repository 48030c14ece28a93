//! Migration to create the field-stage record tables: planting and
//! transport.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PlantingRecords::Table)
                    .if_not_exists()
                    .col(string(PlantingRecords::Id).primary_key())
                    .col(string(PlantingRecords::PlanId).not_null())
                    .col(string(PlantingRecords::Activity).not_null())
                    .col(string_null(PlantingRecords::Operator))
                    .col(timestamp_with_time_zone_null(PlantingRecords::OperatedAt))
                    .col(text_null(PlantingRecords::Remarks))
                    .col(timestamp_with_time_zone(PlantingRecords::CreatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_planting_records_plan_id")
                    .table(PlantingRecords::Table)
                    .col(PlantingRecords::PlanId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TransportRecords::Table)
                    .if_not_exists()
                    .col(string(TransportRecords::Id).primary_key())
                    .col(string(TransportRecords::PlanId).not_null())
                    .col(string(TransportRecords::VehicleNo).not_null())
                    .col(string_null(TransportRecords::Driver))
                    .col(string_null(TransportRecords::Origin))
                    .col(string_null(TransportRecords::Destination))
                    .col(timestamp_with_time_zone_null(TransportRecords::DepartedAt))
                    .col(timestamp_with_time_zone_null(TransportRecords::ArrivedAt))
                    .col(text_null(TransportRecords::Remarks))
                    .col(timestamp_with_time_zone(TransportRecords::CreatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transport_records_plan_id")
                    .table(TransportRecords::Table)
                    .col(TransportRecords::PlanId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TransportRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PlantingRecords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PlantingRecords {
    Table,
    Id,
    PlanId,
    Activity,
    Operator,
    OperatedAt,
    Remarks,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TransportRecords {
    Table,
    Id,
    PlanId,
    VehicleNo,
    Driver,
    Origin,
    Destination,
    DepartedAt,
    ArrivedAt,
    Remarks,
    CreatedAt,
}
