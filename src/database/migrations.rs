pub use sea_orm_migration::prelude::*;

mod m20250806_100000_create_account;
mod m20250806_101000_create_activity;
mod m20250806_102000_create_comment;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250806_100000_create_account::Migration),
            Box::new(m20250806_101000_create_activity::Migration),
            Box::new(m20250806_102000_create_comment::Migration),
        ]
    }
}

pub struct Migrator;
