use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::error::PipelineError;
use crate::{
    account::current_account::CurrentAccount,
    app::App,
    auth::{self, current_user::CurrentUser},
    session::store::{FlashKind, Session},
};

/// Requires the signed-in user to be an administrator.
///
/// A known but unprivileged user is not an error condition: they get a
/// warning flash and a redirect to the account's landing page instead of
/// a hard failure. A visitor with no user at all falls back to the
/// authentication gate's behavior.
pub async fn require_admin(State(app): State<App>, req: Request, next: Next) -> Response {
    let Some(user) = req.extensions().get::<CurrentUser>().cloned() else {
        return PipelineError::AuthenticationRequired {
            sign_in_path: app.config.auth.sign_in_path.clone(),
        }
        .into_response();
    };

    if user.is_admin() {
        return next.run(req).await;
    }

    warn!(user = %user.id, path = %req.uri().path(), "Non-admin user denied admin area");

    if let Some(session) = req.extensions().get::<Session>() {
        session.flash(FlashKind::Alert, "Unauthorized Access!");
    }

    let redirect_to = req
        .extensions()
        .get::<CurrentAccount>()
        .map(|account| account.index_path())
        .unwrap_or_else(|| auth::ROOT_PATH.to_string());

    PipelineError::AuthorizationDenied { redirect_to }.into_response()
}
