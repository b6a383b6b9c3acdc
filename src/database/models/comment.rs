//! `SeaORM` Entity for account-scoped comments

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "comment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub account_id: Uuid,
    pub commentable_type: String,
    pub commentable_id: Uuid,
    pub user_id: Option<Uuid>,
    pub title: Option<String>,
    pub body: String,
    pub parent_id: Option<Uuid>,
    /// Materialized ancestor path (`<root>/<child>/...`), empty for roots
    pub path: String,
    /// Cached depth so thread rendering needs no path parsing
    pub depth: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Materialized path a direct reply to this comment would carry.
    #[must_use]
    pub fn child_path(&self) -> String {
        if self.path.is_empty() {
            self.id.to_string()
        } else {
            format!("{}/{}", self.path, self.id)
        }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
