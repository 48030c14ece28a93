//! Client entity: buyers and partner organizations.

use sea_orm::entity::prelude::*;

use crate::query::NamedColumns;

/// Client entity model.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    /// Unique client identifier (UUID).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name of the organization or person.
    pub name: String,
    /// Contact person.
    pub contact: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Sales region the client belongs to.
    pub region: Option<String>,
    /// Acquisition channel: b2b or mini_app.
    #[sea_orm(default_value = "b2b")]
    pub channel: String,
    /// When the client was registered.
    pub created_at: DateTimeUtc,
    /// When the client was last updated.
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl NamedColumns for Entity {
    fn column_for(field: &str) -> Option<Self::Column> {
        match field {
            "name" => Some(Column::Name),
            "contact" => Some(Column::Contact),
            "phone" => Some(Column::Phone),
            "region" => Some(Column::Region),
            "channel" => Some(Column::Channel),
            "created_at" => Some(Column::CreatedAt),
            "updated_at" => Some(Column::UpdatedAt),
            _ => None,
        }
    }
}
