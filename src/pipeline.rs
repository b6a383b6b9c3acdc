//! The per-request scoping and authorization chain.
//!
//! Every inbound request passes through a fixed sequence of interceptors
//! before it reaches the host application's handler:
//!
//! 1. account resolution (wraps the whole request)
//! 2. session loading
//! 3. current-user loading
//! 4. site-enabled gate
//! 5. locale resolution
//! 6. theme resolution
//! 7. transport policy enforcement
//! 8. navigation tracking
//! 9. activity recording
//!
//! Authentication and authorization gates are applied per area (see
//! [`crate::router::protected_routes`] and [`crate::router::admin_routes`])
//! and run between the chain above and the handler. Any gate may abort
//! the chain with a redirect; the account resolver aborts with an empty
//! response when no tenant matches.

use axum::{
    middleware::{from_fn, from_fn_with_state},
    Router,
};

use crate::{app::App, auth, session};

pub mod account_resolver;
pub mod activity;
pub mod authentication;
pub mod authorization;
pub mod error;
pub mod locale;
pub mod protocol;
pub mod site_enabled;
pub mod store_location;
pub mod theme;

/// Wrap `router` in the full interceptor chain.
///
/// Layers wrap everything added before them, so the last `.layer` call is
/// the first interceptor to run: read the list bottom-up for execution
/// order. The activity recorder is attached with `route_layer` so it runs
/// after route matching and can see the matched path.
pub fn attach(router: Router, app: &App) -> Router {
    router
        .route_layer(from_fn_with_state(app.clone(), activity::record_activity))
        .layer(from_fn(store_location::store_location))
        .layer(from_fn_with_state(app.clone(), protocol::enforce_transport_policy))
        .layer(from_fn_with_state(app.clone(), theme::resolve_theme))
        .layer(from_fn(locale::resolve_locale))
        .layer(from_fn(site_enabled::enforce_site_enabled))
        .layer(from_fn_with_state(app.clone(), auth::middleware::load_current_user))
        .layer(from_fn_with_state(app.clone(), session::middleware::load_session))
        .layer(from_fn_with_state(app.clone(), account_resolver::resolve_account))
}
