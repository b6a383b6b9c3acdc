use std::sync::LazyLock;

use axum::{extract::Request, middleware::Next, response::Response};
use regex::Regex;

use crate::session::store::Session;

/// Identity-management paths are never stored as a return target, so a
/// sign-in can not loop back into the sign-in flow. The site-enabled gate
/// uses the same pattern to keep these paths reachable.
pub(crate) static RESERVED_IDENTITY_PATHS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("/users").unwrap());

/// Remembers the last non-identity URL the visitor touched.
///
/// The stored value is the post-login redirect target: a visitor arriving
/// from an email link has the destination saved here before the
/// authentication gate bounces them to sign-in.
pub async fn store_location(req: Request, next: Next) -> Response {
    if !RESERVED_IDENTITY_PATHS.is_match(req.uri().path()) {
        if let Some(session) = req.extensions().get::<Session>() {
            let full_path = req
                .uri()
                .path_and_query()
                .map_or_else(|| req.uri().path().to_string(), |pq| pq.as_str().to_string());

            session.set_previous_url(full_path);
        }
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_pattern_matches_identity_paths() {
        assert!(RESERVED_IDENTITY_PATHS.is_match("/users/sign_in"));
        assert!(RESERVED_IDENTITY_PATHS.is_match("/en/users/password/new"));
    }

    #[test]
    fn test_reserved_pattern_ignores_content_paths() {
        assert!(!RESERVED_IDENTITY_PATHS.is_match("/en/lessons"));
        assert!(!RESERVED_IDENTITY_PATHS.is_match("/"));
    }
}
