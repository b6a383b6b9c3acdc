use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::{cookie, store::Session};
use crate::app::App;

/// Loads (or creates) the cookie-backed session for this request.
///
/// The session handle is inserted as a request extension so that gates
/// and handlers share one server-side entry. A fresh session gets its
/// signed id cookie appended to the response.
pub async fn load_session(State(app): State<App>, mut req: Request, next: Next) -> Response {
    let existing = cookie_value(&req, &app.config.session.cookie_name)
        .and_then(|token| cookie::unseal_session_id(&app.config.session, &token))
        .and_then(|id| app.sessions.get(id));

    let (session, is_new) = match existing {
        Some(session) => (session, false),
        None => (app.sessions.create(), true),
    };

    req.extensions_mut().insert(session.clone());

    let mut response = next.run(req).await;

    if is_new {
        set_session_cookie(&mut response, &app, &session);
    }

    response
}

fn cookie_value(req: &Request, name: &str) -> Option<String> {
    req.headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

fn set_session_cookie(response: &mut Response, app: &App, session: &Session) {
    let token = match cookie::seal_session_id(&app.config.session, session.id()) {
        Ok(token) => token,
        Err(error) => {
            warn!(%error, "Failed to sign session cookie, continuing without one");
            return;
        }
    };

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        app.config.session.cookie_name, token
    );

    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(error) => {
            warn!(%error, "Session cookie is not a valid header value");
        }
    }
}
