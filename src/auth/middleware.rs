use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use tracing::warn;

use crate::{app::App, auth::current_user::CurrentUser, session::store::Session};

/// Last-access writes are skipped while the stored value is fresher than
/// this, bounding them to at most one per request.
const LAST_ACCESS_STALE_AFTER_MINUTES: i64 = 10;

/// Resolves the session's user through the identity provider.
///
/// Inserts `CurrentUser` as a request extension when a valid signed-in
/// user exists. An identity backend failure is logged and treated as
/// signed-out; the gates decide what that means for the route.
pub async fn load_current_user(State(app): State<App>, mut req: Request, next: Next) -> Response {
    let user_id = req
        .extensions()
        .get::<Session>()
        .and_then(Session::user_id);

    if let Some(user_id) = user_id {
        match app.identity.user_for(user_id).await {
            Ok(Some(user)) => {
                touch_last_access(&app, &user).await;
                req.extensions_mut().insert(CurrentUser(Arc::new(user)));
            }
            Ok(None) => {
                // The user was deleted since the session was issued
                if let Some(session) = req.extensions().get::<Session>() {
                    session.set_user_id(None);
                }
            }
            Err(error) => {
                warn!(%error, %user_id, "Identity lookup failed, treating request as signed out");
            }
        }
    }

    next.run(req).await
}

async fn touch_last_access(app: &App, user: &crate::auth::identity::AuthenticatedUser) {
    let now = Utc::now();
    let stale = user.last_access.is_none_or(|last| {
        now - last > Duration::minutes(LAST_ACCESS_STALE_AFTER_MINUTES)
    });

    if !stale {
        return;
    }

    if let Err(error) = app.identity.touch_last_access(user.id, now).await {
        warn!(%error, user_id = %user.id, "Failed to update last access");
    }
}
