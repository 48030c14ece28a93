//! Warehouse job entity: one processing batch moving through the plant.

use sea_orm::entity::prelude::*;

use crate::query::NamedColumns;

/// Warehouse job entity model.
///
/// `status` is derived from the completion of the job's five processing
/// segments and is only ever written by the warehouse service; there is
/// no public way to set it directly.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "warehouse_jobs")]
pub struct Model {
    /// Unique job identifier (UUID).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Order this batch fulfils, if already sold.
    pub order_id: Option<String>,
    /// Production plan the raw material came from.
    pub plan_id: Option<String>,
    /// Product being produced (e.g. "camellia oil 500ml").
    pub product_name: String,
    /// Production batch number printed on the packaging.
    pub batch_no: Option<String>,
    /// Derived status: preparing, in_progress, complete.
    #[sea_orm(default_value = "preparing")]
    pub status: String,
    /// When the job was created.
    pub created_at: DateTimeUtc,
    /// When the job was last updated.
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::processing_segment::Entity")]
    ProcessingSegment,
}

impl Related<super::processing_segment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProcessingSegment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl NamedColumns for Entity {
    fn column_for(field: &str) -> Option<Self::Column> {
        match field {
            "order_id" => Some(Column::OrderId),
            "plan_id" => Some(Column::PlanId),
            "product_name" => Some(Column::ProductName),
            "batch_no" => Some(Column::BatchNo),
            "status" => Some(Column::Status),
            "created_at" => Some(Column::CreatedAt),
            "updated_at" => Some(Column::UpdatedAt),
            _ => None,
        }
    }
}
