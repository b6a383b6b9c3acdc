use std::net::SocketAddr;

use axum::{routing::get, Router};
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::{
    account::registry::AccountRegistry,
    api::health_checks::ok,
    app::App,
    audit::AuditSink,
    boot::BootConfig,
    config::Config,
    database::setup_database,
    environment::Environment,
    mailer::Mailer,
    pipeline::theme::ThemeRegistry,
    router::router,
    session::store::SessionStore,
};

pub async fn handle_serve_command<AppMigrator: MigratorTrait>(
    environment: Environment,
    config: Config,
    boot_config: BootConfig,
) {
    let port = config.server.port;

    // We start a temporary liveness server for Kubernetes to know that the application is alive
    let liveness_server_task = tokio::spawn(start_liveness_server(port));

    let (db, migration_receiver) = setup_database::<AppMigrator>(&config.database).await;

    // Wait for migrations to complete
    match migration_receiver.await {
        Ok(Ok(())) => {
            info!("✅ Database is ready!");
        }
        Ok(Err(e)) => {
            error!("❌ Database setup failed: {}", e);
            liveness_server_task.abort();
            return;
        }
        Err(_) => {
            error!("❌ Database setup channel closed unexpectedly");
            liveness_server_task.abort();
            return;
        }
    }

    let mailer = Mailer::from_config(&config.email);

    // The tenant registry must be loaded before traffic is accepted;
    // every request begins with a registry lookup.
    let accounts = AccountRegistry::new();
    match accounts.reload_from(&db).await {
        Ok(count) => {
            info!("✅ {count} account(s) ready");
        }
        Err(e) => {
            error!("❌ Failed to load the tenant registry: {}", e);
            liveness_server_task.abort();
            return;
        }
    }

    let app = App {
        config: config.clone(),
        environment,
        db: db.clone(),
        mailer,
        accounts,
        sessions: SessionStore::new(),
        audit: AuditSink::database(db),
        themes: ThemeRegistry::from_config(&config.themes),
        identity: boot_config.identity.clone(),
        transport_policy: boot_config.transport_policy,
    };

    // Stop the temporary liveness server
    liveness_server_task.abort();
    let _ = liveness_server_task.await;

    // Start the full server
    let router = router(app, boot_config.app_router);
    start_server(router, port).await;
}

// Minimal server that only serves liveness endpoint during migrations
async fn start_liveness_server(port: u16) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await.unwrap();

    let migration_router = Router::new().route("/liveness", get(ok));
    axum::serve(listener, migration_router).await.unwrap();
}

// Full server with all endpoints
async fn start_server(router: Router, port: u16) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await.unwrap();

    info!("🌐 Server starting on http://{}", addr);
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
