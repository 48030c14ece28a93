//! Processing segment entity: one of the five fixed sub-steps of a
//! warehouse job.

use sea_orm::entity::prelude::*;

use crate::query::NamedColumns;

/// Processing segment entity model.
///
/// Every job owns exactly one segment per kind (feed, press, refine,
/// package, store); the pair is enforced by a unique index and checked
/// again whenever segments are read for status derivation.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "processing_segments")]
pub struct Model {
    /// Unique segment identifier (UUID).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owning warehouse job.
    pub job_id: String,
    /// Segment kind: feed, press, refine, package, store.
    pub kind: String,
    /// Whether this sub-step is finished.
    pub completed: bool,
    /// Person who ran the sub-step.
    pub operator: Option<String>,
    /// When the sub-step was run.
    pub operated_at: Option<DateTimeUtc>,
    /// JSON array of stored media file names.
    pub media: Option<String>,
    /// Free-form notes.
    pub remarks: Option<String>,
    /// When the segment row was created.
    pub created_at: DateTimeUtc,
    /// When the segment was last updated.
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::warehouse_job::Entity",
        from = "Column::JobId",
        to = "super::warehouse_job::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    WarehouseJob,
}

impl Related<super::warehouse_job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WarehouseJob.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl NamedColumns for Entity {
    fn column_for(field: &str) -> Option<Self::Column> {
        match field {
            "job_id" => Some(Column::JobId),
            "kind" => Some(Column::Kind),
            "completed" => Some(Column::Completed),
            "operator" => Some(Column::Operator),
            "operated_at" => Some(Column::OperatedAt),
            "created_at" => Some(Column::CreatedAt),
            "updated_at" => Some(Column::UpdatedAt),
            _ => None,
        }
    }
}
