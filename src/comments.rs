use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::database::models::comment;

/// Comments shown per page.
pub const PER_PAGE: u64 = 10;

/// Input for a new comment. Threading fields are derived from the parent
/// at creation time, never supplied by callers.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub account_id: Uuid,
    pub commentable_type: String,
    pub commentable_id: Uuid,
    pub user_id: Option<Uuid>,
    pub title: Option<String>,
    pub body: String,
    pub parent: Option<comment::Model>,
}

impl NewComment {
    fn into_active_model(self) -> comment::ActiveModel {
        let now = Utc::now().naive_utc();
        let (parent_id, path, depth) = match &self.parent {
            Some(parent) => (Some(parent.id), parent.child_path(), parent.depth + 1),
            None => (None, String::new(), 0),
        };

        comment::ActiveModel {
            id: Set(Uuid::new_v4()),
            created_at: Set(now),
            updated_at: Set(now),
            account_id: Set(self.account_id),
            commentable_type: Set(self.commentable_type),
            commentable_id: Set(self.commentable_id),
            user_id: Set(self.user_id),
            title: Set(self.title),
            body: Set(self.body),
            parent_id: Set(parent_id),
            path: Set(path),
            depth: Set(depth),
        }
    }
}

/// Persist a comment, deriving its thread position from the parent.
pub async fn create(db: &DatabaseConnection, new_comment: NewComment) -> Result<(), DbErr> {
    comment::Entity::insert(new_comment.into_active_model())
        .exec(db)
        .await?;
    Ok(())
}

/// One page of a commentable's thread, scoped to the owning account.
///
/// Ordering by materialized path then creation time yields a
/// depth-first thread: each reply follows its parent.
pub async fn page_for(
    db: &DatabaseConnection,
    account_id: Uuid,
    commentable_type: &str,
    commentable_id: Uuid,
    page: u64,
) -> Result<Vec<comment::Model>, DbErr> {
    comment::Entity::find()
        .filter(comment::Column::AccountId.eq(account_id))
        .filter(comment::Column::CommentableType.eq(commentable_type))
        .filter(comment::Column::CommentableId.eq(commentable_id))
        .order_by_asc(comment::Column::Path)
        .order_by_asc(comment::Column::CreatedAt)
        .offset(page.saturating_sub(1) * PER_PAGE)
        .limit(PER_PAGE)
        .all(db)
        .await
}

/// The most recent comment on anything owned by the account.
pub async fn most_recent(
    db: &DatabaseConnection,
    account_id: Uuid,
) -> Result<Option<comment::Model>, DbErr> {
    comment::Entity::find()
        .filter(comment::Column::AccountId.eq(account_id))
        .order_by_desc(comment::Column::CreatedAt)
        .one(db)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_comment() -> comment::Model {
        comment::Model {
            id: Uuid::new_v4(),
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
            account_id: Uuid::new_v4(),
            commentable_type: "Page".to_string(),
            commentable_id: Uuid::new_v4(),
            user_id: None,
            title: None,
            body: "First!".to_string(),
            parent_id: None,
            path: String::new(),
            depth: 0,
        }
    }

    #[test]
    fn test_root_child_path_is_own_id() {
        let root = root_comment();
        assert!(root.is_root());
        assert_eq!(root.child_path(), root.id.to_string());
    }

    #[test]
    fn test_reply_derives_thread_position() {
        let root = root_comment();
        let reply = NewComment {
            account_id: root.account_id,
            commentable_type: root.commentable_type.clone(),
            commentable_id: root.commentable_id,
            user_id: None,
            title: None,
            body: "Welcome".to_string(),
            parent: Some(root.clone()),
        }
        .into_active_model();

        assert_eq!(reply.parent_id.clone().unwrap(), Some(root.id));
        assert_eq!(reply.path.clone().unwrap(), root.id.to_string());
        assert_eq!(reply.depth.clone().unwrap(), 1);
    }

    #[test]
    fn test_nested_reply_extends_path() {
        let root = root_comment();
        let mut child = root_comment();
        child.parent_id = Some(root.id);
        child.path = root.id.to_string();
        child.depth = 1;

        assert_eq!(child.child_path(), format!("{}/{}", root.id, child.id));
    }
}
