//! Transport record entity: raw-material haulage from field to plant.

use sea_orm::entity::prelude::*;

use crate::query::NamedColumns;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transport_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Plan whose harvest is being moved.
    pub plan_id: String,
    /// Vehicle plate number.
    pub vehicle_no: String,
    pub driver: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departed_at: Option<DateTimeUtc>,
    pub arrived_at: Option<DateTimeUtc>,
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
            "vehicle_no" => Some(Column::VehicleNo),
            "driver" => Some(Column::Driver),
            "origin" => Some(Column::Origin),
            "destination" => Some(Column::Destination),
            "departed_at" => Some(Column::DepartedAt),
            "arrived_at" => Some(Column::ArrivedAt),
            "created_at" => Some(Column::CreatedAt),
            _ => None,
        }
    }
}
