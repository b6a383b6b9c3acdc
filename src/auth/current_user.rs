use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};

use crate::{app::App, auth::identity::AuthenticatedUser};

/// Authenticated user for the current request.
///
/// The user-loading middleware resolves the session's user through the
/// identity provider once per request and inserts this extension; the
/// extractor only reads it. Use in handlers that sit behind the
/// authentication gate.
///
/// # Example
/// ```rust,ignore
/// use mantle::auth::current_user::CurrentUser;
///
/// pub async fn profile(current_user: CurrentUser) -> String {
///     format!("Signed in as {}", current_user.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Arc<AuthenticatedUser>);

impl std::ops::Deref for CurrentUser {
    type Target = AuthenticatedUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection mirrors the authentication gate: send the visitor to the
/// login page rather than answering with a bare status code.
#[derive(Debug)]
pub struct NotSignedIn {
    sign_in_path: String,
}

impl IntoResponse for NotSignedIn {
    fn into_response(self) -> Response {
        Redirect::to(&self.sign_in_path).into_response()
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    App: FromRef<S>,
{
    type Rejection = NotSignedIn;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| {
                let app = App::from_ref(state);
                NotSignedIn {
                    sign_in_path: app.config.auth.sign_in_path.clone(),
                }
            })
    }
}
