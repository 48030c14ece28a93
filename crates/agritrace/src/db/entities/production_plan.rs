//! Production plan entity: one planned crop cycle on one plot.

use sea_orm::entity::prelude::*;

use crate::query::NamedColumns;

/// Production plan entity model.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "production_plans")]
pub struct Model {
    /// Unique plan identifier (UUID).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Client the harvest is earmarked for, if any.
    pub client_id: Option<String>,
    /// Crop being grown (e.g. "camellia", "rapeseed").
    pub crop: String,
    /// Plot or field name.
    pub plot: Option<String>,
    /// Expected yield in kilograms.
    pub planned_yield_kg: Option<i64>,
    /// Growing season label (e.g. "2026-spring").
    pub season: Option<String>,
    /// When the plan was created.
    pub created_at: DateTimeUtc,
    /// When the plan was last updated.
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl NamedColumns for Entity {
    fn column_for(field: &str) -> Option<Self::Column> {
        match field {
            "client_id" => Some(Column::ClientId),
            "crop" => Some(Column::Crop),
            "plot" => Some(Column::Plot),
            "planned_yield_kg" => Some(Column::PlannedYieldKg),
            "season" => Some(Column::Season),
            "created_at" => Some(Column::CreatedAt),
            "updated_at" => Some(Column::UpdatedAt),
            _ => None,
        }
    }
}
