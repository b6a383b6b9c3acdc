//! `SeaORM` Entity for the request activity audit trail
//!
//! Rows are append-only: created once per handled request, never updated
//! or deleted by this crate.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "activity")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTime,
    pub session_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub browser: Option<String>,
    pub ip_address: Option<String>,
    pub controller: String,
    pub action: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub params: Json,
    pub slug: Option<String>,
    pub lesson: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
