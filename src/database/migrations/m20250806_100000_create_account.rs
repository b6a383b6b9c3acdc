use sea_orm_migration::{
    prelude::*,
    schema::{boolean, string, timestamp, uuid},
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Account::Table)
                    .if_not_exists()
                    .col(
                        uuid(Account::Id)
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(
                        timestamp(Account::CreatedAt)
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        timestamp(Account::UpdatedAt)
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(string(Account::AccountPrefix).not_null())
                    .col(string(Account::Host).not_null().unique_key())
                    .col(
                        string(Account::PreferredDefaultLocale)
                            .not_null()
                            .default("en"),
                    )
                    .col(boolean(Account::SiteEnabled).not_null().default(true))
                    .col(boolean(Account::SslEnabled).not_null().default(false))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-account-account_prefix")
                    .table(Account::Table)
                    .col(Account::AccountPrefix)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Account::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Account {
    Table,
    Id,
    CreatedAt,
    UpdatedAt,
    AccountPrefix,
    Host,
    PreferredDefaultLocale,
    SiteEnabled,
    SslEnabled,
}
