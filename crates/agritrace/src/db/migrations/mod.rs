//! Database migrations.

use sea_orm_migration::prelude::*;

mod m20260410_000001_create_clients_table;
mod m20260410_000002_create_production_plans_table;
mod m20260411_000001_create_stage_record_tables;
mod m20260412_000001_create_warehouse_tables;
mod m20260413_000001_create_orders_and_logistics;
mod m20260501_000001_create_messages_table;
mod m20260520_000001_create_trace_codes_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260410_000001_create_clients_table::Migration),
            Box::new(m20260410_000002_create_production_plans_table::Migration),
            Box::new(m20260411_000001_create_stage_record_tables::Migration),
            Box::new(m20260412_000001_create_warehouse_tables::Migration),
            Box::new(m20260413_000001_create_orders_and_logistics::Migration),
            Box::new(m20260501_000001_create_messages_table::Migration),
            Box::new(m20260520_000001_create_trace_codes_table::Migration),
        ]
    }
}
