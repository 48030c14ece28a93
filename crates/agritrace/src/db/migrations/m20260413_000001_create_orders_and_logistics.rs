//! Migration to create the orders and logistics_records tables.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(string(Orders::Id).primary_key())
                    .col(string(Orders::OrderNo).not_null())
                    .col(string_null(Orders::ClientId))
                    .col(string(Orders::Channel).not_null())
                    .col(string(Orders::ProductName).not_null())
                    .col(big_integer(Orders::Quantity).not_null())
                    .col(big_integer(Orders::AmountCents).not_null())
                    .col(string(Orders::Status).not_null().default("pending"))
                    .col(timestamp_with_time_zone(Orders::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Orders::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        // Order numbers are caller-facing and must never collide.
        manager
            .create_index(
                Index::create()
                    .name("idx_orders_order_no")
                    .table(Orders::Table)
                    .col(Orders::OrderNo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_client_id")
                    .table(Orders::Table)
                    .col(Orders::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_status_created_at")
                    .table(Orders::Table)
                    .col(Orders::Status)
                    .col(Orders::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LogisticsRecords::Table)
                    .if_not_exists()
                    .col(string(LogisticsRecords::Id).primary_key())
                    .col(string(LogisticsRecords::OrderId).not_null())
                    .col(string(LogisticsRecords::Carrier).not_null())
                    .col(string_null(LogisticsRecords::TrackingNo))
                    .col(timestamp_with_time_zone_null(LogisticsRecords::ShippedAt))
                    .col(timestamp_with_time_zone_null(LogisticsRecords::DeliveredAt))
                    .col(text_null(LogisticsRecords::Remarks))
                    .col(timestamp_with_time_zone(LogisticsRecords::CreatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_logistics_records_order_id")
                    .table(LogisticsRecords::Table)
                    .col(LogisticsRecords::OrderId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LogisticsRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    OrderNo,
    ClientId,
    Channel,
    ProductName,
    Quantity,
    AmountCents,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LogisticsRecords {
    Table,
    Id,
    OrderId,
    Carrier,
    TrackingNo,
    ShippedAt,
    DeliveredAt,
    Remarks,
    CreatedAt,
}
