use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use super::error::PipelineError;
use crate::{account::current_account::CurrentAccount, app::App, fragments::ContentFragments};

/// Resolves the tenant for the request and scopes everything else to it.
///
/// Runs as the outermost interceptor so the account is ambient for the
/// entire request, including response rendering. When no account matches
/// the host, the offending URL and remote address are logged and the
/// chain is aborted with an empty response; nothing downstream runs.
pub async fn resolve_account(State(app): State<App>, mut req: Request, next: Next) -> Response {
    let host = request_host(&req).unwrap_or_default();

    let account = match app.accounts.resolve(&host) {
        Ok(account) => account,
        Err(not_found) => {
            let remote_addr = req
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|connect_info| connect_info.0.to_string());

            error!(
                url = %req.uri(),
                remote_addr = remote_addr.as_deref().unwrap_or("unknown"),
                "{not_found}"
            );

            return PipelineError::TenantNotFound {
                host: not_found.host,
            }
            .into_response();
        }
    };

    debug!(account = %account.account_prefix, "Tenant resolved");

    req.extensions_mut().insert(CurrentAccount(account));
    // Ambient render state is established together with the tenant scope
    req.extensions_mut().insert(ContentFragments::new());

    next.run(req).await
}

fn request_host(req: &Request) -> Option<String> {
    req.headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or_else(|| req.uri().host().map(str::to_string))
}
