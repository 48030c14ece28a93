//! Production plans: one planned crop cycle each, the anchor the whole
//! trace chain hangs off.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::db::entities::{client, production_plan};
use crate::error::ServiceError;
use crate::query::{self, render_datetime, PageRequest, PageResult};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPlan {
    pub crop: String,
    pub client_id: Option<String>,
    pub plot: Option<String>,
    pub planned_yield_kg: Option<i64>,
    pub season: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanUpdate {
    pub crop: Option<String>,
    pub client_id: Option<String>,
    pub plot: Option<String>,
    pub planned_yield_kg: Option<i64>,
    pub season: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanFilter {
    pub client_id: Option<String>,
    pub season: Option<String>,
    pub crop_like: Option<String>,
}

/// Shaped production plan row.
#[derive(Debug, Clone, Serialize)]
pub struct PlanView {
    pub id: String,
    pub client_id: Option<String>,
    pub crop: String,
    pub plot: Option<String>,
    pub planned_yield_kg: Option<i64>,
    pub season: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<production_plan::Model> for PlanView {
    fn from(model: production_plan::Model) -> Self {
        PlanView {
            created_at: render_datetime(&model.created_at),
            updated_at: render_datetime(&model.updated_at),
            id: model.id,
            client_id: model.client_id,
            crop: model.crop,
            plot: model.plot,
            planned_yield_kg: model.planned_yield_kg,
            season: model.season,
        }
    }
}

/// Creates a plan. A referenced client must exist.
pub async fn create(db: &DatabaseConnection, input: NewPlan) -> Result<PlanView, ServiceError> {
    if input.crop.trim().is_empty() {
        return Err(ServiceError::validation("crop must not be empty"));
    }
    if let Some(yield_kg) = input.planned_yield_kg {
        if yield_kg <= 0 {
            return Err(ServiceError::validation(
                "planned_yield_kg must be positive",
            ));
        }
    }
    if let Some(client_id) = &input.client_id {
        ensure_client_exists(db, client_id).await?;
    }

    let now = Utc::now();
    let model = production_plan::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        client_id: Set(input.client_id),
        crop: Set(input.crop),
        plot: Set(input.plot),
        planned_yield_kg: Set(input.planned_yield_kg),
        season: Set(input.season),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    info!(plan_id = %model.id, crop = %model.crop, "created production plan");
    Ok(PlanView::from(model))
}

pub async fn get(db: &DatabaseConnection, id: &str) -> Result<PlanView, ServiceError> {
    let model = find(db, id).await?;
    Ok(PlanView::from(model))
}

pub async fn update(
    db: &DatabaseConnection,
    id: &str,
    change: PlanUpdate,
) -> Result<PlanView, ServiceError> {
    let model = find(db, id).await?;
    let mut active: production_plan::ActiveModel = model.into();

    if let Some(crop) = change.crop {
        if crop.trim().is_empty() {
            return Err(ServiceError::validation("crop must not be empty"));
        }
        active.crop = Set(crop);
    }
    if let Some(client_id) = change.client_id {
        ensure_client_exists(db, &client_id).await?;
        active.client_id = Set(Some(client_id));
    }
    if let Some(plot) = change.plot {
        active.plot = Set(Some(plot));
    }
    if let Some(yield_kg) = change.planned_yield_kg {
        if yield_kg <= 0 {
            return Err(ServiceError::validation(
                "planned_yield_kg must be positive",
            ));
        }
        active.planned_yield_kg = Set(Some(yield_kg));
    }
    if let Some(season) = change.season {
        active.season = Set(Some(season));
    }
    active.updated_at = Set(Utc::now());

    let model = active.update(db).await?;
    Ok(PlanView::from(model))
}

pub async fn remove(db: &DatabaseConnection, id: &str) -> Result<(), ServiceError> {
    let model = find(db, id).await?;
    model.delete(db).await?;
    info!(plan_id = %id, "removed production plan");
    Ok(())
}

pub async fn list(
    db: &DatabaseConnection,
    filter: &PlanFilter,
    page: &PageRequest,
) -> Result<PageResult<PlanView>, ServiceError> {
    let mut select = production_plan::Entity::find();

    if let Some(client_id) = &filter.client_id {
        select = query::filter_eq(select, &[("client_id", client_id.as_str())])?;
    }
    if let Some(season) = &filter.season {
        select = query::filter_eq(select, &[("season", season.as_str())])?;
    }
    if let Some(crop) = &filter.crop_like {
        select = query::filter_like(select, &[("crop", crop.as_str())])?;
    }

    Ok(query::page_with_order(db, select, page).await?)
}

pub(crate) async fn find(
    db: &DatabaseConnection,
    id: &str,
) -> Result<production_plan::Model, ServiceError> {
    production_plan::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Production plan", id))
}

async fn ensure_client_exists(db: &DatabaseConnection, id: &str) -> Result<(), ServiceError> {
    client::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Client", id))?;
    Ok(())
}
