//! QR traceability: codes printed on packaging resolve to the full
//! production chain of the batch behind them.

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::db::entities::{
    logistics_record, planting_record, production_plan, trace_code, transport_record,
};
use crate::error::ServiceError;
use crate::plans::PlanView;
use crate::query::{self, render_datetime, transform, PageRequest, PageResult};
use crate::stages::logistics::LogisticsView;
use crate::stages::planting::PlantingView;
use crate::stages::transport::TransportView;
use crate::warehouse::{self, WarehouseJobDetail};

/// Printed code shape: uppercase alphanumeric with dashes, 6 to 32
/// characters, never starting with a dash.
static RE_TRACE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9][A-Z0-9-]{5,31}$").unwrap());

#[derive(Debug, Clone, Deserialize)]
pub struct NewTraceCode {
    pub code: String,
    pub plan_id: String,
    pub order_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TraceCodeView {
    pub code: String,
    pub plan_id: String,
    pub order_id: Option<String>,
    pub created_at: String,
}

impl From<trace_code::Model> for TraceCodeView {
    fn from(model: trace_code::Model) -> Self {
        TraceCodeView {
            created_at: render_datetime(&model.created_at),
            code: model.code,
            plan_id: model.plan_id,
            order_id: model.order_id,
        }
    }
}

/// Everything a consumer scanning the code gets to see, oldest first
/// within each stage.
#[derive(Debug, Clone, Serialize)]
pub struct TraceReport {
    pub code: String,
    /// None when the plan was deleted after the code was issued.
    pub plan: Option<PlanView>,
    pub planting: Vec<PlantingView>,
    pub transport: Vec<TransportView>,
    pub warehouse: Vec<WarehouseJobDetail>,
    pub logistics: Vec<LogisticsView>,
}

/// Issues a trace code for a plan. The code text must be unused and
/// well-formed.
pub async fn register(
    db: &DatabaseConnection,
    input: NewTraceCode,
) -> Result<TraceCodeView, ServiceError> {
    ensure_well_formed(&input.code)?;
    production_plan::Entity::find_by_id(&input.plan_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Production plan", &input.plan_id))?;

    // Codes are the primary key; a duplicate registration trips the
    // constraint even when two registrations race.
    let model = trace_code::ActiveModel {
        code: Set(input.code.clone()),
        plan_id: Set(input.plan_id),
        order_id: Set(input.order_id),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            ServiceError::integrity(format!("Trace code '{}' already exists", input.code))
        }
        _ => ServiceError::Database(err),
    })?;

    info!(code = %model.code, plan_id = %model.plan_id, "registered trace code");
    Ok(TraceCodeView::from(model))
}

/// Resolves a scanned code into the full chain report.
pub async fn lookup(db: &DatabaseConnection, code: &str) -> Result<TraceReport, ServiceError> {
    ensure_well_formed(code)?;
    let issued = trace_code::Entity::find_by_id(code)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Trace code", code))?;

    let plan = production_plan::Entity::find_by_id(&issued.plan_id)
        .one(db)
        .await?;
    if plan.is_none() {
        warn!(code = %issued.code, plan_id = %issued.plan_id, "trace code points at a deleted plan");
    }

    let planting = planting_record::Entity::find()
        .filter(planting_record::Column::PlanId.eq(issued.plan_id.as_str()))
        .order_by_asc(planting_record::Column::CreatedAt)
        .all(db)
        .await?;
    let transport = transport_record::Entity::find()
        .filter(transport_record::Column::PlanId.eq(issued.plan_id.as_str()))
        .order_by_asc(transport_record::Column::CreatedAt)
        .all(db)
        .await?;
    let jobs = warehouse::details_for_plan(db, &issued.plan_id).await?;

    let logistics = match &issued.order_id {
        Some(order_id) => {
            logistics_record::Entity::find()
                .filter(logistics_record::Column::OrderId.eq(order_id.as_str()))
                .order_by_asc(logistics_record::Column::CreatedAt)
                .all(db)
                .await?
        }
        None => Vec::new(),
    };

    Ok(TraceReport {
        code: issued.code,
        plan: plan.map(PlanView::from),
        planting: transform(planting),
        transport: transform(transport),
        warehouse: jobs,
        logistics: transform(logistics),
    })
}

/// Lists the codes issued for one plan.
pub async fn list_for_plan(
    db: &DatabaseConnection,
    plan_id: &str,
    page: &PageRequest,
) -> Result<PageResult<TraceCodeView>, ServiceError> {
    let select = query::filter_eq(trace_code::Entity::find(), &[("plan_id", plan_id)])?;
    Ok(query::page_with_order(db, select, page).await?)
}

/// Revokes an issued code.
pub async fn remove(db: &DatabaseConnection, code: &str) -> Result<(), ServiceError> {
    let model = trace_code::Entity::find_by_id(code)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Trace code", code))?;
    model.delete(db).await?;
    info!(code = %code, "revoked trace code");
    Ok(())
}

fn ensure_well_formed(code: &str) -> Result<(), ServiceError> {
    if RE_TRACE_CODE.is_match(code) {
        Ok(())
    } else {
        Err(ServiceError::validation(format!(
            "Malformed trace code '{code}'"
        )))
    }
}
