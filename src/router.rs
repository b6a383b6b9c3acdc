use axum::{
    extract::Request,
    middleware::{from_fn, from_fn_with_state},
    response::Redirect,
    routing::get,
    Extension, Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    account::current_account::CurrentAccount,
    api,
    app::App,
    fragments::ContentFragments,
    pipeline::{self, authentication, authorization, locale::Locale},
};

/// Assemble the full application router.
///
/// Tenant-facing routes (the crate's own plus the host's) sit inside the
/// request pipeline; health probes stay outside it so they work without a
/// resolvable tenant.
pub fn router(app: App, app_router: fn(App) -> Router) -> Router {
    let tenant_router = Router::new()
        .route("/", get(index_redirect))
        .route("/{locale}/coming_soon", get(coming_soon))
        .with_state(app.clone())
        .merge(app_router(app.clone()));

    let tenant_router = pipeline::attach(tenant_router, &app);

    Router::new()
        .route("/liveness", get(api::health_checks::ok))
        .route("/readiness", get(api::health_checks::readiness))
        .with_state(app)
        .merge(tenant_router)
        .layer(TraceLayer::new_for_http())
}

/// Wrap routes behind the authentication gate.
pub fn protected_routes(app: &App, routes: Router) -> Router {
    routes.route_layer(from_fn_with_state(
        app.clone(),
        authentication::require_authentication,
    ))
}

/// Wrap routes behind the authentication and admin gates.
///
/// The template hook seeds the admin layout fragment for the render
/// layer; hosts can overwrite it per handler.
pub fn admin_routes(app: &App, routes: Router) -> Router {
    routes
        .route_layer(from_fn(admin_template_setup))
        .route_layer(from_fn_with_state(
            app.clone(),
            authorization::require_admin,
        ))
        .route_layer(from_fn_with_state(
            app.clone(),
            authentication::require_authentication,
        ))
}

async fn admin_template_setup(
    req: Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    if let Some(fragments) = req.extensions().get::<ContentFragments>() {
        fragments.set("layout", "admin");
    }
    next.run(req).await
}

/// `GET /` sends visitors to the account's localized landing page.
async fn index_redirect(account: CurrentAccount) -> Redirect {
    Redirect::permanent(&account.index_path())
}

/// Placeholder page shown while a site is disabled.
async fn coming_soon(
    Extension(locale): Extension<Locale>,
    Extension(fragments): Extension<ContentFragments>,
) -> String {
    fragments.set("title", "Coming Soon");
    format!("Coming soon ({locale})")
}
