use std::collections::HashMap;

use axum::{
    extract::{Query, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::{error::PipelineError, store_location::RESERVED_IDENTITY_PATHS};
use crate::{account::current_account::CurrentAccount, auth::current_user::CurrentUser};

/// Role that may preview a disabled site alongside administrators.
const PREVIEW_ROLE: &str = "beta";

/// Blocks public traffic while the account's site is disabled.
///
/// Exceptions, in order: the coming-soon page itself, identity-management
/// paths (a visitor must always be able to reach sign-in), and admin or
/// beta sessions. Everyone else is redirected to the account's localized
/// coming-soon page.
pub async fn enforce_site_enabled(req: Request, next: Next) -> Response {
    let Some(account) = req.extensions().get::<CurrentAccount>().cloned() else {
        return next.run(req).await;
    };

    if account.site_enabled {
        return next.run(req).await;
    }

    let path = req.uri().path();
    if path.ends_with("/coming_soon") || slug_param(&req).as_deref() == Some("coming_soon") {
        return next.run(req).await;
    }

    if RESERVED_IDENTITY_PATHS.is_match(path) {
        return next.run(req).await;
    }

    if let Some(user) = req.extensions().get::<CurrentUser>() {
        if user.is_admin() || user.has_role(PREVIEW_ROLE) {
            return next.run(req).await;
        }
    }

    debug!(account = %account.account_prefix, path, "Site disabled, redirecting to coming soon");

    PipelineError::SiteDisabled {
        coming_soon_path: account.coming_soon_path(),
    }
    .into_response()
}

fn slug_param(req: &Request) -> Option<String> {
    Query::<HashMap<String, String>>::try_from_uri(req.uri())
        .ok()
        .and_then(|Query(params)| params.get("slug").cloned())
}
