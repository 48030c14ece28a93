//! Logistics record entity: finished-goods shipments for an order.

use sea_orm::entity::prelude::*;

use crate::query::NamedColumns;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "logistics_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Order being shipped.
    pub order_id: String,
    /// Carrier company handling the shipment.
    pub carrier: String,
    /// Carrier tracking number.
    pub tracking_no: Option<String>,
    pub shipped_at: Option<DateTimeUtc>,
    pub delivered_at: Option<DateTimeUtc>,
    pub remarks: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl NamedColumns for Entity {
    fn column_for(field: &str) -> Option<Self::Column> {
        match field {
            "order_id" => Some(Column::OrderId),
            "carrier" => Some(Column::Carrier),
            "tracking_no" => Some(Column::TrackingNo),
            "shipped_at" => Some(Column::ShippedAt),
            "delivered_at" => Some(Column::DeliveredAt),
            "created_at" => Some(Column::CreatedAt),
            _ => None,
        }
    }
}
