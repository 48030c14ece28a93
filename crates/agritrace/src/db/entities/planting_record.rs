//! Planting record entity: field activities logged against a plan.

use sea_orm::entity::prelude::*;

use crate::query::NamedColumns;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "planting_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Plan this activity belongs to.
    pub plan_id: String,
    /// Activity performed: sow, fertilize, irrigate, weed, harvest...
    pub activity: String,
    /// Person who performed the activity.
    pub operator: Option<String>,
    /// When the activity happened in the field.
    pub operated_at: Option<DateTimeUtc>,
    pub remarks: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl NamedColumns for Entity {
    fn column_for(field: &str) -> Option<Self::Column> {
        match field {
            "plan_id" => Some(Column::PlanId),
            "activity" => Some(Column::Activity),
            "operator" => Some(Column::Operator),
            "operated_at" => Some(Column::OperatedAt),
            "created_at" => Some(Column::CreatedAt),
            _ => None,
        }
    }
}
