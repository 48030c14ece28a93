//! Back-office messages pushed to clients: shipment notices, payment
//! reminders, trace-report publication alerts.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::entities::{client, message};
use crate::error::ServiceError;
use crate::query::{self, render_datetime, PageRequest, PageResult};

#[derive(Debug, Clone, Deserialize)]
pub struct NewMessage {
    pub client_id: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageFilter {
    pub client_id: Option<String>,
    /// When set, keep only unread (true) or only read (false) messages.
    pub unread_only: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    pub id: String,
    pub client_id: String,
    pub title: String,
    pub body: String,
    pub read: bool,
    pub created_at: String,
}

impl From<message::Model> for MessageView {
    fn from(model: message::Model) -> Self {
        MessageView {
            created_at: render_datetime(&model.created_at),
            id: model.id,
            client_id: model.client_id,
            title: model.title,
            body: model.body,
            read: model.read,
        }
    }
}

pub async fn create(
    db: &DatabaseConnection,
    input: NewMessage,
) -> Result<MessageView, ServiceError> {
    if input.title.trim().is_empty() {
        return Err(ServiceError::validation("title must not be empty"));
    }
    client::Entity::find_by_id(&input.client_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Client", &input.client_id))?;

    let model = message::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        client_id: Set(input.client_id),
        title: Set(input.title),
        body: Set(input.body),
        read: Set(false),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;

    info!(message_id = %model.id, client_id = %model.client_id, "queued message");
    Ok(MessageView::from(model))
}

/// Marks a message read. Re-marking an already-read message is a no-op.
pub async fn mark_read(db: &DatabaseConnection, id: &str) -> Result<MessageView, ServiceError> {
    let model = find(db, id).await?;
    if model.read {
        return Ok(MessageView::from(model));
    }

    let mut active: message::ActiveModel = model.into();
    active.read = Set(true);
    let model = active.update(db).await?;

    debug!(message_id = %model.id, "message marked read");
    Ok(MessageView::from(model))
}

pub async fn remove(db: &DatabaseConnection, id: &str) -> Result<(), ServiceError> {
    let model = find(db, id).await?;
    model.delete(db).await?;
    Ok(())
}

pub async fn list(
    db: &DatabaseConnection,
    filter: &MessageFilter,
    page: &PageRequest,
) -> Result<PageResult<MessageView>, ServiceError> {
    let mut select = message::Entity::find();

    if let Some(client_id) = &filter.client_id {
        select = query::filter_eq(select, &[("client_id", client_id.as_str())])?;
    }
    if let Some(unread) = filter.unread_only {
        select = select.filter(message::Column::Read.eq(!unread));
    }

    Ok(query::page_with_order(db, select, page).await?)
}

async fn find(db: &DatabaseConnection, id: &str) -> Result<message::Model, ServiceError> {
    message::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Message", id))
}
