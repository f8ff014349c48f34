use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    /// Session id as rendered by `tower_sessions::session::Id`
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,

    /// JSON-encoded session data map
    #[sea_orm(column_type = "Text")]
    pub data: String,

    /// Unix timestamp (seconds)
    pub expiry_date: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
