use std::{collections::BTreeMap, net::SocketAddr};

use axum::{
    extract::{ConnectInfo, MatchedPath, Query, Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::{
    app::App,
    audit::ActivityRecord,
    auth::current_user::CurrentUser,
    session::store::Session,
};

type Params = BTreeMap<String, String>;

/// Writes one audit record per request, before the handler runs.
///
/// Active only in production. Recording is best-effort: a sink failure is
/// logged and the request proceeds, since auditing is not part of the
/// request's success contract.
pub async fn record_activity(State(app): State<App>, req: Request, next: Next) -> Response {
    if app.environment.is_production() {
        let record = build_record(&req);
        if let Err(error) = app.audit.record(record).await {
            warn!(%error, "Activity recording failed");
        }
    }

    next.run(req).await
}

fn build_record(req: &Request) -> ActivityRecord {
    let params: Params = Query::try_from_uri(req.uri())
        .map(|Query(params)| params)
        .unwrap_or_default();

    // Who is doing the activity?
    let session_id = req.extensions().get::<Session>().map(Session::id);
    let user_id = req.extensions().get::<CurrentUser>().map(|user| user.id);
    let browser = header_string(req, header::USER_AGENT);
    let ip_address = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|connect_info| connect_info.0.ip().to_string());

    // What are they doing?
    let controller = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| req.uri().path().to_string(), |path| path.as_str().to_string());
    let action = req.method().as_str().to_lowercase();

    ActivityRecord {
        session_id,
        user_id,
        browser,
        ip_address,
        controller,
        action,
        params: serde_json::to_value(&params).unwrap_or_default(),
        slug: params.get("slug").filter(|slug| !slug.is_empty()).cloned(),
        lesson: lesson_descriptor(&params),
    }
}

fn header_string(req: &Request, name: header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Composite lesson-path descriptor: course, lesson, and content slugs
/// joined with commas, present only when a course slug is.
fn lesson_descriptor(params: &Params) -> Option<String> {
    let course = params.get("course_slug").filter(|slug| !slug.is_empty())?;
    let lesson = params.get("lesson_slug").map(String::as_str).unwrap_or_default();
    let content = params.get("content_slug").map(String::as_str).unwrap_or_default();

    Some(format!("{course},{lesson},{content}"))
}
