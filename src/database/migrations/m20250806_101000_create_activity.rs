use sea_orm_migration::{
    prelude::*,
    schema::{json_binary, string, timestamp, uuid},
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Activity::Table)
                    .if_not_exists()
                    .col(
                        uuid(Activity::Id)
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(
                        timestamp(Activity::CreatedAt)
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(ColumnDef::new(Activity::SessionId).uuid().null())
                    .col(ColumnDef::new(Activity::UserId).uuid().null())
                    .col(ColumnDef::new(Activity::Browser).string().null())
                    .col(ColumnDef::new(Activity::IpAddress).string().null())
                    .col(string(Activity::Controller).not_null())
                    .col(string(Activity::Action).not_null())
                    .col(json_binary(Activity::Params).not_null())
                    .col(ColumnDef::new(Activity::Slug).string().null())
                    .col(ColumnDef::new(Activity::Lesson).string().null())
                    .to_owned(),
            )
            .await?;

        // Append-only table, read back by user and by time
        manager
            .create_index(
                Index::create()
                    .name("idx-activity-user_id")
                    .table(Activity::Table)
                    .col(Activity::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-activity-created_at")
                    .table(Activity::Table)
                    .col(Activity::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Activity::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Activity {
    Table,
    Id,
    CreatedAt,
    SessionId,
    UserId,
    Browser,
    IpAddress,
    Controller,
    Action,
    Params,
    Slug,
    Lesson,
}
