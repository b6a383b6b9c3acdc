use sea_orm_migration::{
    prelude::*,
    schema::{integer, string, text, timestamp, uuid},
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Comment::Table)
                    .if_not_exists()
                    .col(
                        uuid(Comment::Id)
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(
                        timestamp(Comment::CreatedAt)
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        timestamp(Comment::UpdatedAt)
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(uuid(Comment::AccountId).not_null())
                    .col(string(Comment::CommentableType).not_null())
                    .col(uuid(Comment::CommentableId).not_null())
                    .col(ColumnDef::new(Comment::UserId).uuid().null())
                    .col(ColumnDef::new(Comment::Title).string().null())
                    .col(text(Comment::Body).not_null())
                    .col(ColumnDef::new(Comment::ParentId).uuid().null())
                    .col(string(Comment::Path).not_null().default(""))
                    .col(integer(Comment::Depth).not_null().default(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-comment-commentable")
                    .table(Comment::Table)
                    .col(Comment::AccountId)
                    .col(Comment::CommentableType)
                    .col(Comment::CommentableId)
                    .to_owned(),
            )
            .await?;

        // Thread reads are ordered by materialized path
        manager
            .create_index(
                Index::create()
                    .name("idx-comment-path")
                    .table(Comment::Table)
                    .col(Comment::Path)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Comment {
    Table,
    Id,
    CreatedAt,
    UpdatedAt,
    AccountId,
    CommentableType,
    CommentableId,
    UserId,
    Title,
    Body,
    ParentId,
    Path,
    Depth,
}
