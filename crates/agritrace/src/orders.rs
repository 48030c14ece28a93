//! Orders: client purchases moving through a fixed fulfilment ladder.
//!
//! Status only ever advances one rung at a time, pending -> paid ->
//! shipped -> closed. Skips and reversals are rejected so the ledger of
//! state changes stays replayable.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, Set, SqlErr};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::clients;
use crate::db::entities::{client, order};
use crate::error::ServiceError;
use crate::query::{self, render_datetime, PageRequest, PageResult};

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Closed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Closed => "closed",
        }
    }

    pub fn parse(value: &str) -> Option<OrderStatus> {
        match value {
            "pending" => Some(OrderStatus::Pending),
            "paid" => Some(OrderStatus::Paid),
            "shipped" => Some(OrderStatus::Shipped),
            "closed" => Some(OrderStatus::Closed),
            _ => None,
        }
    }

    /// Position on the fulfilment ladder; transitions must climb by one.
    fn rank(&self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Paid => 1,
            OrderStatus::Shipped => 2,
            OrderStatus::Closed => 3,
        }
    }
}

/// Input for placing an order.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub order_no: String,
    pub client_id: Option<String>,
    pub channel: Option<String>,
    pub product_name: String,
    pub quantity: i64,
    pub amount_cents: i64,
}

/// Listing filter for orders.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderFilter {
    pub client_id: Option<String>,
    pub channel: Option<String>,
    pub status: Option<String>,
    pub product_like: Option<String>,
}

/// Shaped order row.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub id: String,
    pub order_no: String,
    pub client_id: Option<String>,
    pub channel: String,
    pub product_name: String,
    pub quantity: i64,
    pub amount_cents: i64,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<order::Model> for OrderView {
    fn from(model: order::Model) -> Self {
        OrderView {
            created_at: render_datetime(&model.created_at),
            updated_at: render_datetime(&model.updated_at),
            id: model.id,
            order_no: model.order_no,
            client_id: model.client_id,
            channel: model.channel,
            product_name: model.product_name,
            quantity: model.quantity,
            amount_cents: model.amount_cents,
            status: model.status,
        }
    }
}

/// Places an order. The order number must be unused.
pub async fn create(db: &DatabaseConnection, input: NewOrder) -> Result<OrderView, ServiceError> {
    if input.order_no.trim().is_empty() {
        return Err(ServiceError::validation("order_no must not be empty"));
    }
    if input.product_name.trim().is_empty() {
        return Err(ServiceError::validation("product_name must not be empty"));
    }
    if input.quantity <= 0 {
        return Err(ServiceError::validation("quantity must be positive"));
    }
    if input.amount_cents < 0 {
        return Err(ServiceError::validation("amount_cents must not be negative"));
    }
    let channel = clients::resolve_channel(input.channel.as_deref())?;
    if let Some(client_id) = &input.client_id {
        client::Entity::find_by_id(client_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Client", client_id))?;
    }
    // The unique index on order_no is the arbiter for duplicates,
    // concurrent placements included.
    let now = Utc::now();
    let model = order::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        order_no: Set(input.order_no.clone()),
        client_id: Set(input.client_id),
        channel: Set(channel.as_str().to_string()),
        product_name: Set(input.product_name),
        quantity: Set(input.quantity),
        amount_cents: Set(input.amount_cents),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::integrity(format!(
            "Order number '{}' already exists",
            input.order_no
        )),
        _ => ServiceError::Database(err),
    })?;

    info!(order_id = %model.id, order_no = %model.order_no, "placed order");
    Ok(OrderView::from(model))
}

pub async fn get(db: &DatabaseConnection, id: &str) -> Result<OrderView, ServiceError> {
    let model = find(db, id).await?;
    Ok(OrderView::from(model))
}

/// Moves an order one step along the fulfilment ladder.
pub async fn advance_status(
    db: &DatabaseConnection,
    id: &str,
    next: &str,
) -> Result<OrderView, ServiceError> {
    let target = OrderStatus::parse(next)
        .ok_or_else(|| ServiceError::validation(format!("Unknown order status '{next}'")))?;
    let model = find(db, id).await?;
    let current = OrderStatus::parse(&model.status).ok_or_else(|| {
        ServiceError::integrity(format!(
            "Order {} carries unknown status '{}'",
            model.id, model.status
        ))
    })?;

    if target.rank() != current.rank() + 1 {
        return Err(ServiceError::validation(format!(
            "Cannot move order from '{}' to '{}'",
            current.as_str(),
            target.as_str()
        )));
    }

    let mut active: order::ActiveModel = model.into();
    active.status = Set(target.as_str().to_string());
    active.updated_at = Set(Utc::now());
    let model = active.update(db).await?;

    info!(order_id = %model.id, status = %model.status, "order status advanced");
    Ok(OrderView::from(model))
}

pub async fn remove(db: &DatabaseConnection, id: &str) -> Result<(), ServiceError> {
    let model = find(db, id).await?;
    model.delete(db).await?;
    info!(order_id = %id, "removed order");
    Ok(())
}

pub async fn list(
    db: &DatabaseConnection,
    filter: &OrderFilter,
    page: &PageRequest,
) -> Result<PageResult<OrderView>, ServiceError> {
    let mut select = order::Entity::find();

    if let Some(client_id) = &filter.client_id {
        select = query::filter_eq(select, &[("client_id", client_id.as_str())])?;
    }
    if let Some(channel) = &filter.channel {
        clients::resolve_channel(Some(channel))?;
        select = query::filter_eq(select, &[("channel", channel.as_str())])?;
    }
    if let Some(status) = &filter.status {
        OrderStatus::parse(status)
            .ok_or_else(|| ServiceError::validation(format!("Unknown order status '{status}'")))?;
        select = query::filter_eq(select, &[("status", status.as_str())])?;
    }
    if let Some(product) = &filter.product_like {
        select = query::filter_like(select, &[("product_name", product.as_str())])?;
    }

    Ok(query::page_with_order(db, select, page).await?)
}

async fn find(db: &DatabaseConnection, id: &str) -> Result<order::Model, ServiceError> {
    order::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Order", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn test_db() -> DatabaseConnection {
        db::connect_in_memory().await.unwrap()
    }

    fn sample_order(order_no: &str) -> NewOrder {
        NewOrder {
            order_no: order_no.to_string(),
            client_id: None,
            channel: None,
            product_name: "camellia oil 500ml".to_string(),
            quantity: 24,
            amount_cents: 312_000,
        }
    }

    #[tokio::test]
    async fn test_create_starts_pending() {
        let db = test_db().await;
        let placed = create(&db, sample_order("SO-001")).await.unwrap();
        assert_eq!(placed.status, "pending");
        assert_eq!(placed.channel, "b2b");
    }

    #[tokio::test]
    async fn test_create_validates_amounts() {
        let db = test_db().await;

        let mut zero_qty = sample_order("SO-002");
        zero_qty.quantity = 0;
        assert!(matches!(
            create(&db, zero_qty).await,
            Err(ServiceError::Validation { .. })
        ));

        let mut negative = sample_order("SO-003");
        negative.amount_cents = -1;
        assert!(matches!(
            create(&db, negative).await,
            Err(ServiceError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_order_no_is_integrity_error() {
        let db = test_db().await;
        create(&db, sample_order("SO-004")).await.unwrap();
        // The second insert trips the unique index; the constraint error
        // must come back as an integrity failure, not a database one.
        match create(&db, sample_order("SO-004")).await {
            Err(ServiceError::Integrity { message }) => {
                assert_eq!(message, "Order number 'SO-004' already exists");
            }
            other => panic!("expected integrity error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_status_ladder_advances_one_step() {
        let db = test_db().await;
        let placed = create(&db, sample_order("SO-005")).await.unwrap();

        let paid = advance_status(&db, &placed.id, "paid").await.unwrap();
        assert_eq!(paid.status, "paid");
        let shipped = advance_status(&db, &placed.id, "shipped").await.unwrap();
        assert_eq!(shipped.status, "shipped");
        let closed = advance_status(&db, &placed.id, "closed").await.unwrap();
        assert_eq!(closed.status, "closed");
    }

    #[tokio::test]
    async fn test_status_skip_rejected() {
        let db = test_db().await;
        let placed = create(&db, sample_order("SO-006")).await.unwrap();
        let result = advance_status(&db, &placed.id, "shipped").await;
        assert!(matches!(result, Err(ServiceError::Validation { .. })));

        // Row is untouched by the failed transition.
        assert_eq!(get(&db, &placed.id).await.unwrap().status, "pending");
    }

    #[tokio::test]
    async fn test_status_reversal_rejected() {
        let db = test_db().await;
        let placed = create(&db, sample_order("SO-007")).await.unwrap();
        advance_status(&db, &placed.id, "paid").await.unwrap();
        let result = advance_status(&db, &placed.id, "pending").await;
        assert!(matches!(result, Err(ServiceError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_closed_is_terminal() {
        let db = test_db().await;
        let placed = create(&db, sample_order("SO-008")).await.unwrap();
        for next in ["paid", "shipped", "closed"] {
            advance_status(&db, &placed.id, next).await.unwrap();
        }
        for next in ["pending", "paid", "shipped", "closed"] {
            assert!(advance_status(&db, &placed.id, next).await.is_err());
        }
    }

    #[tokio::test]
    async fn test_unknown_status_rejected() {
        let db = test_db().await;
        let placed = create(&db, sample_order("SO-009")).await.unwrap();
        let result = advance_status(&db, &placed.id, "refunded").await;
        assert!(matches!(result, Err(ServiceError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_list_by_status() {
        let db = test_db().await;
        for n in 1..=3 {
            create(&db, sample_order(&format!("SO-10{n}"))).await.unwrap();
        }
        let placed = create(&db, sample_order("SO-104")).await.unwrap();
        advance_status(&db, &placed.id, "paid").await.unwrap();

        let pending = list(
            &db,
            &OrderFilter {
                status: Some("pending".to_string()),
                ..OrderFilter::default()
            },
            &PageRequest::default(),
        )
        .await
        .unwrap();
        assert_eq!(pending.total, 3);

        let bogus = list(
            &db,
            &OrderFilter {
                status: Some("refunded".to_string()),
                ..OrderFilter::default()
            },
            &PageRequest::default(),
        )
        .await;
        assert!(matches!(bogus, Err(ServiceError::Validation { .. })));
    }
}
