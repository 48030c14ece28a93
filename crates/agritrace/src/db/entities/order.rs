//! Order entity: a client purchase moving through fulfilment.

use sea_orm::entity::prelude::*;

use crate::query::NamedColumns;

/// Order entity model.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique order identifier (UUID).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Human-facing order number, unique across all orders.
    #[sea_orm(unique)]
    pub order_no: String,
    /// Buying client, if known.
    pub client_id: Option<String>,
    /// Channel the order came through: b2b or mini_app.
    pub channel: String,
    /// Product sold.
    pub product_name: String,
    /// Number of units.
    pub quantity: i64,
    /// Total price in cents.
    pub amount_cents: i64,
    /// Fulfilment status: pending, paid, shipped, closed.
    #[sea_orm(default_value = "pending")]
    pub status: String,
    /// When the order was placed.
    pub created_at: DateTimeUtc,
    /// When the order was last updated.
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl NamedColumns for Entity {
    fn column_for(field: &str) -> Option<Self::Column> {
        match field {
            "order_no" => Some(Column::OrderNo),
            "client_id" => Some(Column::ClientId),
            "channel" => Some(Column::Channel),
            "product_name" => Some(Column::ProductName),
            "quantity" => Some(Column::Quantity),
            "amount_cents" => Some(Column::AmountCents),
            "status" => Some(Column::Status),
            "created_at" => Some(Column::CreatedAt),
            "updated_at" => Some(Column::UpdatedAt),
            _ => None,
        }
    }
}
