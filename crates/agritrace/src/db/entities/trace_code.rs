//! Trace code entity: the QR code printed on packaging, pointing back
//! at a production plan.

use sea_orm::entity::prelude::*;

use crate::query::NamedColumns;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trace_codes")]
pub struct Model {
    /// The code itself, as printed (uppercase alphanumeric plus dashes).
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    /// Plan whose chain this code resolves to.
    pub plan_id: String,
    /// Order the coded packaging was produced for, if any.
    pub order_id: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl NamedColumns for Entity {
    fn column_for(field: &str) -> Option<Self::Column> {
        match field {
            "code" => Some(Column::Code),
            "plan_id" => Some(Column::PlanId),
            "order_id" => Some(Column::OrderId),
            "created_at" => Some(Column::CreatedAt),
            _ => None,
        }
    }
}
