//! Warehouse jobs and their five processing segments.
//!
//! A job's status is derived from segment completion and written only
//! here; nothing outside this module sets it. Media attachments are
//! written through the staged two-phase protocol of
//! [`crate::storage::MediaStore`].

pub mod status;

pub use status::{derive_status, CompletionFlags, JobStatus, SegmentKind};

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::db::entities::{processing_segment, warehouse_job};
use crate::error::ServiceError;
use crate::query::{self, render_datetime, render_datetime_opt, PageRequest, PageResult};
use crate::storage::{MediaStore, MediaUpload};

/// Input for creating a warehouse job.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewWarehouseJob {
    pub product_name: String,
    pub batch_no: Option<String>,
    pub order_id: Option<String>,
    pub plan_id: Option<String>,
}

/// Partial update for one processing segment. Absent fields are left
/// untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SegmentUpdate {
    pub operator: Option<String>,
    pub operated_at: Option<DateTime<Utc>>,
    pub remarks: Option<String>,
    pub completed: Option<bool>,
}

/// Listing filter for warehouse jobs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WarehouseJobFilter {
    pub status: Option<String>,
    pub order_id: Option<String>,
    pub plan_id: Option<String>,
    pub product_like: Option<String>,
}

/// Shaped warehouse job row.
#[derive(Debug, Clone, Serialize)]
pub struct WarehouseJobView {
    pub id: String,
    pub order_id: Option<String>,
    pub plan_id: Option<String>,
    pub product_name: String,
    pub batch_no: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<warehouse_job::Model> for WarehouseJobView {
    fn from(model: warehouse_job::Model) -> Self {
        WarehouseJobView {
            created_at: render_datetime(&model.created_at),
            updated_at: render_datetime(&model.updated_at),
            id: model.id,
            order_id: model.order_id,
            plan_id: model.plan_id,
            product_name: model.product_name,
            batch_no: model.batch_no,
            status: model.status,
        }
    }
}

/// Shaped processing segment row.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentView {
    pub id: String,
    pub kind: String,
    pub completed: bool,
    pub operator: Option<String>,
    pub operated_at: String,
    pub media: Vec<String>,
    pub remarks: Option<String>,
}

impl From<processing_segment::Model> for SegmentView {
    fn from(model: processing_segment::Model) -> Self {
        SegmentView {
            media: media_names(model.media.as_deref()),
            operated_at: render_datetime_opt(model.operated_at),
            id: model.id,
            kind: model.kind,
            completed: model.completed,
            operator: model.operator,
            remarks: model.remarks,
        }
    }
}

/// A job together with its segments, in processing order.
#[derive(Debug, Clone, Serialize)]
pub struct WarehouseJobDetail {
    #[serde(flatten)]
    pub job: WarehouseJobView,
    pub segments: Vec<SegmentView>,
}

/// Service owning warehouse persistence plus the media store backing
/// segment attachments.
pub struct WarehouseService {
    db: DatabaseConnection,
    media: MediaStore,
}

impl WarehouseService {
    pub fn new(db: DatabaseConnection, media: MediaStore) -> Self {
        WarehouseService { db, media }
    }

    /// Creates a job together with its five segments, all incomplete,
    /// in one transaction.
    pub async fn create_job(
        &self,
        input: NewWarehouseJob,
    ) -> Result<WarehouseJobDetail, ServiceError> {
        if input.product_name.trim().is_empty() {
            return Err(ServiceError::validation("product_name must not be empty"));
        }

        let now = Utc::now();
        let job_id = Uuid::new_v4().to_string();

        let txn = self.db.begin().await?;
        warehouse_job::ActiveModel {
            id: Set(job_id.clone()),
            order_id: Set(input.order_id),
            plan_id: Set(input.plan_id),
            product_name: Set(input.product_name),
            batch_no: Set(input.batch_no),
            status: Set(JobStatus::Preparing.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let segments: Vec<processing_segment::ActiveModel> = SegmentKind::ALL
            .iter()
            .map(|kind| processing_segment::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                job_id: Set(job_id.clone()),
                kind: Set(kind.as_str().to_string()),
                completed: Set(false),
                operator: Set(None),
                operated_at: Set(None),
                media: Set(None),
                remarks: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            })
            .collect();
        processing_segment::Entity::insert_many(segments)
            .exec(&txn)
            .await?;
        txn.commit().await?;

        info!(job_id = %job_id, "created warehouse job");
        self.job_detail(&job_id).await
    }

    /// Loads one job with its segments.
    pub async fn job_detail(&self, job_id: &str) -> Result<WarehouseJobDetail, ServiceError> {
        let job = find_job(&self.db, job_id).await?;
        let segments = load_segments(&self.db, job_id).await?;
        Ok(WarehouseJobDetail {
            job: WarehouseJobView::from(job),
            segments: segments.into_iter().map(SegmentView::from).collect(),
        })
    }

    /// Lists jobs with validated filters, paging and sorting.
    pub async fn list_jobs(
        &self,
        filter: &WarehouseJobFilter,
        page: &PageRequest,
    ) -> Result<PageResult<WarehouseJobView>, ServiceError> {
        let mut select = warehouse_job::Entity::find();

        if let Some(value) = &filter.status {
            let status = JobStatus::parse(value).ok_or_else(|| {
                ServiceError::validation(format!("Unknown job status '{value}'"))
            })?;
            select = select.filter(warehouse_job::Column::Status.eq(status.as_str()));
        }
        if let Some(order_id) = &filter.order_id {
            select = query::filter_eq(select, &[("order_id", order_id.as_str())])?;
        }
        if let Some(plan_id) = &filter.plan_id {
            select = query::filter_eq(select, &[("plan_id", plan_id.as_str())])?;
        }
        if let Some(product) = &filter.product_like {
            select = query::filter_like(select, &[("product_name", product.as_str())])?;
        }

        Ok(query::page_with_order(&self.db, select, page).await?)
    }

    /// Applies a partial update to one segment, then re-derives the
    /// job's status inside the same transaction.
    pub async fn update_segment(
        &self,
        job_id: &str,
        kind: SegmentKind,
        update: SegmentUpdate,
    ) -> Result<WarehouseJobDetail, ServiceError> {
        let txn = self.db.begin().await?;
        let job = find_job(&txn, job_id).await?;
        let segment = find_segment(&txn, job_id, kind).await?;

        let mut active: processing_segment::ActiveModel = segment.into();
        if let Some(operator) = update.operator {
            active.operator = Set(Some(operator));
        }
        if let Some(operated_at) = update.operated_at {
            active.operated_at = Set(Some(operated_at));
        }
        if let Some(remarks) = update.remarks {
            active.remarks = Set(Some(remarks));
        }
        if let Some(completed) = update.completed {
            active.completed = Set(completed);
        }
        active.updated_at = Set(Utc::now());
        active.update(&txn).await?;

        let status = refresh_status(&txn, &job).await?;
        txn.commit().await?;

        debug!(
            job_id,
            kind = kind.as_str(),
            status = status.as_str(),
            "updated segment"
        );
        self.job_detail(job_id).await
    }

    /// Attaches an image or video to a segment.
    ///
    /// The file is staged before the transaction and only promoted into
    /// the store once the row update has committed; on any failure the
    /// staged file is discarded. Attaching marks the segment completed.
    pub async fn attach_media(
        &self,
        job_id: &str,
        kind: SegmentKind,
        upload: &MediaUpload,
    ) -> Result<WarehouseJobDetail, ServiceError> {
        let staged = self.media.stage(upload)?;
        let name = staged.name().to_string();

        match self.attach_media_row(job_id, kind, &name).await {
            Ok(()) => {
                staged.promote()?;
                info!(job_id, kind = kind.as_str(), name = %name, "attached segment media");
                self.job_detail(job_id).await
            }
            Err(err) => {
                staged.discard();
                Err(err)
            }
        }
    }

    async fn attach_media_row(
        &self,
        job_id: &str,
        kind: SegmentKind,
        name: &str,
    ) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        let job = find_job(&txn, job_id).await?;
        let segment = find_segment(&txn, job_id, kind).await?;

        let mut media = decode_media(&segment.id, segment.media.as_deref())?;
        media.push(name.to_string());

        let mut active: processing_segment::ActiveModel = segment.into();
        active.media = Set(encode_media(&media)?);
        active.completed = Set(true);
        active.updated_at = Set(Utc::now());
        active.update(&txn).await?;

        refresh_status(&txn, &job).await?;
        txn.commit().await?;
        Ok(())
    }

    /// Detaches a stored media name from a segment and deletes the file.
    ///
    /// Removing the last name flips the segment back to incomplete. The
    /// row change commits first; the file delete follows, so a storage
    /// failure can leave an orphaned file but never a dangling
    /// reference.
    pub async fn detach_media(
        &self,
        job_id: &str,
        kind: SegmentKind,
        name: &str,
    ) -> Result<WarehouseJobDetail, ServiceError> {
        let txn = self.db.begin().await?;
        let job = find_job(&txn, job_id).await?;
        let segment = find_segment(&txn, job_id, kind).await?;

        let mut media = decode_media(&segment.id, segment.media.as_deref())?;
        let before = media.len();
        media.retain(|item| item != name);
        if media.len() == before {
            return Err(ServiceError::not_found("Media file", name));
        }

        let mut active: processing_segment::ActiveModel = segment.into();
        active.media = Set(encode_media(&media)?);
        if media.is_empty() {
            active.completed = Set(false);
        }
        active.updated_at = Set(Utc::now());
        active.update(&txn).await?;

        refresh_status(&txn, &job).await?;
        txn.commit().await?;

        self.media.delete(name)?;
        debug!(job_id, kind = kind.as_str(), name = %name, "detached segment media");
        self.job_detail(job_id).await
    }

    /// Deletes a job and its segments; stored media files are removed
    /// best-effort after the rows are gone.
    pub async fn delete_job(&self, job_id: &str) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        find_job(&txn, job_id).await?;

        let segments = processing_segment::Entity::find()
            .filter(processing_segment::Column::JobId.eq(job_id))
            .all(&txn)
            .await?;
        let files: Vec<String> = segments
            .iter()
            .flat_map(|segment| media_names(segment.media.as_deref()))
            .collect();

        processing_segment::Entity::delete_many()
            .filter(processing_segment::Column::JobId.eq(job_id))
            .exec(&txn)
            .await?;
        warehouse_job::Entity::delete_by_id(job_id).exec(&txn).await?;
        txn.commit().await?;

        for name in files {
            if let Err(e) = self.media.delete(&name) {
                warn!(name = %name, error = %e, "failed to remove media of deleted job");
            }
        }

        info!(job_id, "deleted warehouse job");
        Ok(())
    }
}

/// Loads every job attached to a plan, oldest first, each with its
/// segments. Trace reports pull the full processing history this way.
pub async fn details_for_plan(
    db: &DatabaseConnection,
    plan_id: &str,
) -> Result<Vec<WarehouseJobDetail>, ServiceError> {
    let jobs = warehouse_job::Entity::find()
        .filter(warehouse_job::Column::PlanId.eq(plan_id))
        .order_by_asc(warehouse_job::Column::CreatedAt)
        .all(db)
        .await?;

    let mut details = Vec::with_capacity(jobs.len());
    for job in jobs {
        let segments = load_segments(db, &job.id).await?;
        details.push(WarehouseJobDetail {
            job: WarehouseJobView::from(job),
            segments: segments.into_iter().map(SegmentView::from).collect(),
        });
    }
    Ok(details)
}

async fn find_job<C: ConnectionTrait>(
    conn: &C,
    job_id: &str,
) -> Result<warehouse_job::Model, ServiceError> {
    warehouse_job::Entity::find_by_id(job_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Warehouse job", job_id))
}

/// Loads the one segment of `kind` for a job.
///
/// The job is known to exist at this point, so zero matches means the
/// segment rows are corrupted, as does more than one.
async fn find_segment<C: ConnectionTrait>(
    conn: &C,
    job_id: &str,
    kind: SegmentKind,
) -> Result<processing_segment::Model, ServiceError> {
    let mut matches = processing_segment::Entity::find()
        .filter(processing_segment::Column::JobId.eq(job_id))
        .filter(processing_segment::Column::Kind.eq(kind.as_str()))
        .all(conn)
        .await?;

    if matches.len() > 1 {
        return Err(ServiceError::integrity(format!(
            "Job '{}' has {} '{}' segments, expected exactly one",
            job_id,
            matches.len(),
            kind.as_str()
        )));
    }
    matches.pop().ok_or_else(|| {
        ServiceError::integrity(format!(
            "Job '{}' is missing its '{}' segment",
            job_id,
            kind.as_str()
        ))
    })
}

/// Loads all segments of a job sorted into processing order.
async fn load_segments<C: ConnectionTrait>(
    conn: &C,
    job_id: &str,
) -> Result<Vec<processing_segment::Model>, ServiceError> {
    let mut segments = processing_segment::Entity::find()
        .filter(processing_segment::Column::JobId.eq(job_id))
        .all(conn)
        .await?;
    // Fixed processing order, not alphabetical; unknown kinds sort last
    // and are caught by the next status derivation.
    segments.sort_by_key(|segment| {
        SegmentKind::parse(&segment.kind)
            .map(|kind| kind.index())
            .unwrap_or(SegmentKind::ALL.len())
    });
    Ok(segments)
}

/// Re-derives and persists the job status from its current segments.
async fn refresh_status(
    txn: &DatabaseTransaction,
    job: &warehouse_job::Model,
) -> Result<JobStatus, ServiceError> {
    let segments = processing_segment::Entity::find()
        .filter(processing_segment::Column::JobId.eq(job.id.as_str()))
        .all(txn)
        .await?;
    let flags = CompletionFlags::from_segments(&segments)?;
    let status = derive_status(&flags);

    if status.as_str() != job.status {
        let mut active: warehouse_job::ActiveModel = job.clone().into();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(Utc::now());
        active.update(txn).await?;
    }
    Ok(status)
}

fn media_names(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|text| serde_json::from_str::<Vec<String>>(text).ok())
        .unwrap_or_default()
}

/// Strict decode for mutation paths: malformed stored JSON is corruption
/// and must not be silently emptied.
fn decode_media(segment_id: &str, raw: Option<&str>) -> Result<Vec<String>, ServiceError> {
    match raw {
        None => Ok(Vec::new()),
        Some(text) => serde_json::from_str(text).map_err(|e| {
            ServiceError::integrity(format!(
                "Segment '{segment_id}' has a malformed media list: {e}"
            ))
        }),
    }
}

fn encode_media(names: &[String]) -> Result<Option<String>, ServiceError> {
    if names.is_empty() {
        return Ok(None);
    }
    serde_json::to_string(names).map(Some).map_err(|e| {
        ServiceError::integrity(format!("Failed to encode media list: {e}"))
    })
}
