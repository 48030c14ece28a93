//! Database entities.

pub mod client;
pub mod logistics_record;
pub mod message;
pub mod order;
pub mod planting_record;
pub mod processing_segment;
pub mod production_plan;
pub mod trace_code;
pub mod transport_record;
pub mod warehouse_job;

pub use client::Entity as Client;
pub use logistics_record::Entity as LogisticsRecord;
pub use message::Entity as Message;
pub use order::Entity as Order;
pub use planting_record::Entity as PlantingRecord;
pub use processing_segment::Entity as ProcessingSegment;
pub use production_plan::Entity as ProductionPlan;
pub use trace_code::Entity as TraceCode;
pub use transport_record::Entity as TransportRecord;
pub use warehouse_job::Entity as WarehouseJob;
