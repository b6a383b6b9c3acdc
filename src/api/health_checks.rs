use axum::{extract::State, http::StatusCode};

use crate::app::{App, ReadinessError};

/// Liveness probe: the process is up.
pub async fn ok() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe: the process can reach its database.
#[axum_macros::debug_handler]
pub async fn readiness(State(app): State<App>) -> Result<StatusCode, ReadinessError> {
    app.db.ping().await?;
    Ok(StatusCode::OK)
}
