//! Client registry: the buyers and partner organizations orders and
//! plans hang off.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::db::entities::client;
use crate::error::ServiceError;
use crate::query::{self, render_datetime, PageRequest, PageResult};

/// Acquisition channel a client or order came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    B2b,
    MiniApp,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::B2b => "b2b",
            Channel::MiniApp => "mini_app",
        }
    }

    pub fn parse(value: &str) -> Option<Channel> {
        match value {
            "b2b" => Some(Channel::B2b),
            "mini_app" => Some(Channel::MiniApp),
            _ => None,
        }
    }
}

/// Input for registering a client.
#[derive(Debug, Clone, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub contact: Option<String>,
    pub phone: Option<String>,
    pub region: Option<String>,
    pub channel: Option<String>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientUpdate {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub phone: Option<String>,
    pub region: Option<String>,
    pub channel: Option<String>,
}

/// Listing filter for clients.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientFilter {
    pub name_like: Option<String>,
    pub region: Option<String>,
    pub channel: Option<String>,
}

/// Shaped client row.
#[derive(Debug, Clone, Serialize)]
pub struct ClientView {
    pub id: String,
    pub name: String,
    pub contact: Option<String>,
    pub phone: Option<String>,
    pub region: Option<String>,
    pub channel: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<client::Model> for ClientView {
    fn from(model: client::Model) -> Self {
        ClientView {
            created_at: render_datetime(&model.created_at),
            updated_at: render_datetime(&model.updated_at),
            id: model.id,
            name: model.name,
            contact: model.contact,
            phone: model.phone,
            region: model.region,
            channel: model.channel,
        }
    }
}

/// Registers a client.
pub async fn create(
    db: &DatabaseConnection,
    input: NewClient,
) -> Result<ClientView, ServiceError> {
    if input.name.trim().is_empty() {
        return Err(ServiceError::validation("name must not be empty"));
    }
    let channel = resolve_channel(input.channel.as_deref())?;

    let now = Utc::now();
    let model = client::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        name: Set(input.name),
        contact: Set(input.contact),
        phone: Set(input.phone),
        region: Set(input.region),
        channel: Set(channel.as_str().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    info!(client_id = %model.id, "registered client");
    Ok(ClientView::from(model))
}

/// Loads one client.
pub async fn get(db: &DatabaseConnection, id: &str) -> Result<ClientView, ServiceError> {
    let model = find(db, id).await?;
    Ok(ClientView::from(model))
}

/// Applies a partial update to a client.
pub async fn update(
    db: &DatabaseConnection,
    id: &str,
    change: ClientUpdate,
) -> Result<ClientView, ServiceError> {
    let model = find(db, id).await?;
    let mut active: client::ActiveModel = model.into();

    if let Some(name) = change.name {
        if name.trim().is_empty() {
            return Err(ServiceError::validation("name must not be empty"));
        }
        active.name = Set(name);
    }
    if let Some(contact) = change.contact {
        active.contact = Set(Some(contact));
    }
    if let Some(phone) = change.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(region) = change.region {
        active.region = Set(Some(region));
    }
    if let Some(channel) = change.channel {
        let parsed = Channel::parse(&channel)
            .ok_or_else(|| ServiceError::validation(format!("Unknown channel '{channel}'")))?;
        active.channel = Set(parsed.as_str().to_string());
    }
    active.updated_at = Set(Utc::now());

    let model = active.update(db).await?;
    Ok(ClientView::from(model))
}

/// Removes a client.
pub async fn remove(db: &DatabaseConnection, id: &str) -> Result<(), ServiceError> {
    let model = find(db, id).await?;
    model.delete(db).await?;
    info!(client_id = %id, "removed client");
    Ok(())
}

/// Lists clients with validated filters, paging and sorting.
pub async fn list(
    db: &DatabaseConnection,
    filter: &ClientFilter,
    page: &PageRequest,
) -> Result<PageResult<ClientView>, ServiceError> {
    let mut select = client::Entity::find();

    if let Some(name) = &filter.name_like {
        select = query::filter_like(select, &[("name", name.as_str())])?;
    }
    if let Some(region) = &filter.region {
        select = query::filter_eq(select, &[("region", region.as_str())])?;
    }
    if let Some(channel) = &filter.channel {
        resolve_channel(Some(channel))?;
        select = query::filter_eq(select, &[("channel", channel.as_str())])?;
    }

    Ok(query::page_with_order(db, select, page).await?)
}

async fn find(db: &DatabaseConnection, id: &str) -> Result<client::Model, ServiceError> {
    client::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Client", id))
}

pub(crate) fn resolve_channel(value: Option<&str>) -> Result<Channel, ServiceError> {
    match value {
        None => Ok(Channel::B2b),
        Some(raw) => Channel::parse(raw)
            .ok_or_else(|| ServiceError::validation(format!("Unknown channel '{raw}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn test_db() -> DatabaseConnection {
        db::connect_in_memory().await.unwrap()
    }

    fn sample_client(name: &str) -> NewClient {
        NewClient {
            name: name.to_string(),
            contact: Some("Li Hua".to_string()),
            phone: Some("13800000000".to_string()),
            region: Some("hunan".to_string()),
            channel: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = test_db().await;
        let created = create(&db, sample_client("Golden Grove Co.")).await.unwrap();
        assert_eq!(created.channel, "b2b");
        assert_eq!(created.created_at.len(), 19);

        let fetched = get(&db, &created.id).await.unwrap();
        assert_eq!(fetched.name, "Golden Grove Co.");
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let db = test_db().await;
        let result = create(&db, sample_client(" ")).await;
        assert!(matches!(result, Err(ServiceError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_channel() {
        let db = test_db().await;
        let mut input = sample_client("A");
        input.channel = Some("door_to_door".to_string());
        let result = create(&db, input).await;
        assert!(matches!(result, Err(ServiceError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_update_partial_fields() {
        let db = test_db().await;
        let created = create(&db, sample_client("Old Name")).await.unwrap();

        let updated = update(
            &db,
            &created.id,
            ClientUpdate {
                name: Some("New Name".to_string()),
                channel: Some("mini_app".to_string()),
                ..ClientUpdate::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.channel, "mini_app");
        // Untouched fields survive.
        assert_eq!(updated.region.as_deref(), Some("hunan"));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let db = test_db().await;
        let result = get(&db, "missing").await;
        assert!(matches!(
            result,
            Err(ServiceError::NotFound { entity: "Client", .. })
        ));
    }

    #[tokio::test]
    async fn test_remove_then_get_fails() {
        let db = test_db().await;
        let created = create(&db, sample_client("Gone Soon")).await.unwrap();
        remove(&db, &created.id).await.unwrap();
        assert!(get(&db, &created.id).await.is_err());
        assert!(remove(&db, &created.id).await.is_err());
    }

    #[tokio::test]
    async fn test_list_filters_and_pages() {
        let db = test_db().await;
        for i in 0..7 {
            let mut input = sample_client(&format!("Client {i}"));
            if i % 2 == 0 {
                input.region = Some("north".to_string());
            }
            create(&db, input).await.unwrap();
        }

        let page = PageRequest {
            page_size: 3,
            sort_field: "name".to_string(),
            direction: crate::query::SortDirection::Asc,
            ..PageRequest::default()
        };
        let result = list(
            &db,
            &ClientFilter {
                region: Some("north".to_string()),
                ..ClientFilter::default()
            },
            &page,
        )
        .await
        .unwrap();

        assert_eq!(result.total, 4);
        assert_eq!(result.total_page, 2);
        assert_eq!(result.data.len(), 3);
        assert_eq!(result.data[0].name, "Client 0");
    }

    #[tokio::test]
    async fn test_list_unknown_sort_field_fails() {
        let db = test_db().await;
        let page = PageRequest {
            sort_field: "secrets".to_string(),
            ..PageRequest::default()
        };
        let result = list(&db, &ClientFilter::default(), &page).await;
        assert!(matches!(result, Err(ServiceError::Validation { .. })));
    }
}
