use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::error::PipelineError;
use crate::{app::App, auth::current_user::CurrentUser};

/// Requires a signed-in user for the routes it wraps.
///
/// The gate only checks that the user-loading step produced a user; proof
/// of identity belongs to the identity collaborator. On failure the chain
/// aborts with a redirect to the sign-in page. The navigation tracker has
/// already stored the current URL at this point, so the visitor returns
/// here after signing in.
pub async fn require_authentication(
    State(app): State<App>,
    req: Request,
    next: Next,
) -> Response {
    if req.extensions().get::<CurrentUser>().is_some() {
        return next.run(req).await;
    }

    debug!(path = %req.uri().path(), "Unauthenticated request to protected area");

    PipelineError::AuthenticationRequired {
        sign_in_path: app.config.auth.sign_in_path.clone(),
    }
    .into_response()
}
