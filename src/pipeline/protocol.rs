use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::{account::current_account::CurrentAccount, app::App};

/// Decides whether a request area requires secure transport.
///
/// The host application can supply its own policy through
/// [`crate::boot::BootConfig`] to relax enforcement for selected areas;
/// the default requires secure transport everywhere.
pub type TransportPolicy = fn(&Request) -> bool;

/// Default policy: every area requires secure transport.
#[must_use]
pub fn require_secure(_req: &Request) -> bool {
    true
}

/// Scheme the request actually arrived on.
///
/// Behind a TLS-terminating proxy the URI scheme is always `http`, so the
/// `x-forwarded-proto` header wins when present. Absent both, the request
/// counts as insecure.
pub(crate) fn request_scheme(req: &Request) -> String {
    req.headers()
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .or_else(|| req.uri().scheme_str())
        .unwrap_or("http")
        .to_string()
}

/// Corrects the transport protocol to match the account's SSL policy.
///
/// Active only in production for accounts with SSL enabled. A mismatch in
/// either direction redirects to the same URL, query included, on the
/// opposite scheme; the retried request then passes the check unchanged.
/// Flash messages ride in the session, so they survive the redirect.
pub async fn enforce_transport_policy(
    State(app): State<App>,
    req: Request,
    next: Next,
) -> Response {
    if !app.environment.is_production() {
        return next.run(req).await;
    }

    let Some(account) = req.extensions().get::<CurrentAccount>().cloned() else {
        return next.run(req).await;
    };

    if !account.ssl_enabled {
        return next.run(req).await;
    }

    let require_secure = (app.transport_policy)(&req);
    let is_secure = request_scheme(&req) == "https";

    if is_secure == require_secure {
        return next.run(req).await;
    }

    let target_scheme = if is_secure { "http" } else { "https" };
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(&account.host);
    let path_and_query = req
        .uri()
        .path_and_query()
        .map_or("/", |path_and_query| path_and_query.as_str());

    let location = format!("{target_scheme}://{host}{path_and_query}");

    debug!(%location, "Correcting transport protocol");

    Redirect::temporary(&location).into_response()
}
