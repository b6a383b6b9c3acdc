use std::fmt::{self, Debug};
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DatabaseConnection;
use thiserror::Error;

use crate::{
    account::registry::AccountRegistry,
    audit::AuditSink,
    auth::identity::IdentityProvider,
    config::Config,
    environment::Environment,
    mailer::Mailer,
    pipeline::{protocol::TransportPolicy, theme::ThemeRegistry},
    session::store::SessionStore,
};

/// Shared application state available to every request.
///
/// The registries and stores are cheap to clone (internally `Arc`'d); the
/// identity provider is the host application's user backend behind a trait.
#[derive(Clone)]
pub struct App {
    pub config: Config,
    pub environment: Environment,
    pub db: DatabaseConnection,
    pub mailer: Mailer,
    pub accounts: AccountRegistry,
    pub sessions: SessionStore,
    pub audit: AuditSink,
    pub themes: ThemeRegistry,
    pub identity: Arc<dyn IdentityProvider>,
    /// Per-area secure-transport policy, overridable by the host
    pub transport_policy: TransportPolicy,
}

impl Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("environment", &self.environment)
            .field("mailer", &self.mailer)
            .field("accounts", &self.accounts)
            .field("audit", &self.audit)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Error)]
pub enum ReadinessError {
    #[error("Database connection error")]
    DatabaseError(#[from] sea_orm::DbErr),
}

impl IntoResponse for ReadinessError {
    fn into_response(self) -> Response {
        (StatusCode::SERVICE_UNAVAILABLE, self.to_string()).into_response()
    }
}
