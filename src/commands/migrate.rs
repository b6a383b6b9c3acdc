use std::{cmp, error::Error, process};

use sea_orm::DatabaseConnection;

use crate::{
    cli::MigrateAction,
    config::Config,
    database::setup_database_connection,
};

pub async fn handle_migrate_command<AppMigrator: sea_orm_migration::MigratorTrait>(
    config: &Config,
    action: MigrateAction,
) {
    // Create a simple connection just for migrations (no background setup)
    let db = setup_database_connection(&config.database).await;

    if let Err(e) = handle_migration_command::<AppMigrator>(&db, action).await {
        eprintln!("❌ Migration failed: {e}");
        process::exit(1);
    }
}

pub async fn handle_migration_command<AppMigrator: sea_orm_migration::MigratorTrait>(
    db: &DatabaseConnection,
    action: MigrateAction,
) -> Result<(), Box<dyn Error>> {
    match action {
        MigrateAction::Up { steps } => {
            println!("Running migrations up...");

            let pending_migrations = AppMigrator::get_pending_migrations(db).await?;

            if pending_migrations.is_empty() {
                println!("✅ All migrations are already up to date");
                return Ok(());
            }

            let migrations_to_apply = match steps {
                Some(steps) => {
                    let count = cmp::min(steps as usize, pending_migrations.len());
                    println!("Running {count} migration(s) up:");
                    &pending_migrations[..count]
                }
                None => {
                    println!(
                        "Running all {} pending migration(s) up:",
                        pending_migrations.len()
                    );
                    &pending_migrations[..]
                }
            };

            for migration in migrations_to_apply {
                println!("  📄 {}", migration.name());
            }
            println!();

            AppMigrator::up(db, steps).await?;

            println!("✅ Migrations completed successfully");
        }
        MigrateAction::Down { steps } => {
            println!("Rolling back {steps} migration(s)...");

            let applied_migrations = AppMigrator::get_applied_migrations(db).await?;

            if applied_migrations.is_empty() {
                println!("❌ No migrations to roll back");
                return Ok(());
            }

            let migrations_to_revert = cmp::min(steps as usize, applied_migrations.len());
            let revert_slice =
                &applied_migrations[applied_migrations.len() - migrations_to_revert..];

            println!("Rolling back migrations:");
            for migration in revert_slice.iter().rev() {
                println!("  📄 {}", migration.name());
            }
            println!();

            AppMigrator::down(db, Some(steps)).await?;
            println!("✅ Rollback completed successfully");
        }
        MigrateAction::Status => {
            match AppMigrator::get_pending_migrations(db).await {
                Ok(pending) => {
                    if pending.is_empty() {
                        println!("✅ All migrations are up to date");
                    } else {
                        println!("📋 Pending migrations:");
                        for migration in pending {
                            println!("  - {}", migration.name());
                        }
                    }
                }
                Err(e) => {
                    eprintln!("❌ Failed to check migration status: {e}");
                    return Err(e.into());
                }
            }

            match AppMigrator::get_applied_migrations(db).await {
                Ok(applied) => {
                    println!("📋 Applied migrations:");
                    for migration in applied {
                        println!("  ✓ {}", migration.name());
                    }
                }
                Err(e) => {
                    eprintln!("❌ Failed to get applied migrations: {e}");
                    return Err(e.into());
                }
            }
        }
        MigrateAction::Reset => {
            println!("🔄 Resetting database (this will drop all data!)...");

            let applied = AppMigrator::get_applied_migrations(db).await?;
            let num_applied =
                u32::try_from(applied.len()).map_err(|_| "Too many migrations to reset")?;

            if num_applied > 0 {
                println!("Rolling back {num_applied} applied migrations:");
                for migration in applied.iter().rev() {
                    println!("  📄 {}", migration.name());
                }
                println!();

                AppMigrator::down(db, Some(num_applied)).await?;
                println!("✅ All migrations rolled back");
            } else {
                println!("No migrations to roll back");
            }

            let pending = AppMigrator::get_pending_migrations(db).await?;
            println!("Running all {} migration(s) up:", pending.len());
            for migration in &pending {
                println!("  📄 {}", migration.name());
            }
            println!();

            AppMigrator::up(db, None).await?;
            println!("✅ Database reset completed successfully");
        }
    }

    Ok(())
}
