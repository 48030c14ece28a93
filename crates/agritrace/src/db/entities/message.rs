//! Message entity: back-office notices delivered to clients.

use sea_orm::entity::prelude::*;

use crate::query::NamedColumns;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Receiving client.
    pub client_id: String,
    pub title: String,
    pub body: String,
    /// Whether the client has opened the message.
    pub read: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl NamedColumns for Entity {
    fn column_for(field: &str) -> Option<Self::Column> {
        match field {
            "client_id" => Some(Column::ClientId),
            "title" => Some(Column::Title),
            "read" => Some(Column::Read),
            "created_at" => Some(Column::CreatedAt),
            _ => None,
        }
    }
}
