use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

/// Every way an interceptor can abort the chain.
///
/// All variants resolve to an HTTP response; nothing here escapes to the
/// hosting runtime.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no account registered for host {host:?}")]
    TenantNotFound { host: String },

    #[error("authentication required")]
    AuthenticationRequired { sign_in_path: String },

    #[error("not authorized for this area")]
    AuthorizationDenied { redirect_to: String },

    #[error("site is not enabled")]
    SiteDisabled { coming_soon_path: String },
}

impl IntoResponse for PipelineError {
    /// Handlers are matched most specific first; keep the arm order in
    /// sync with the severity of the failure.
    fn into_response(self) -> Response {
        match self {
            // Unknown tenant: the caller already logged the offending URL.
            // Answer with an empty body so probes and crawlers get nothing
            // to chew on.
            Self::TenantNotFound { .. } => StatusCode::OK.into_response(),
            // Visitor is unknown: send them to prove who they are.
            Self::AuthenticationRequired { sign_in_path } => {
                Redirect::to(&sign_in_path).into_response()
            }
            // Visitor is known but unprivileged: soft redirect, the flash
            // was already set by the gate.
            Self::AuthorizationDenied { redirect_to } => {
                Redirect::to(&redirect_to).into_response()
            }
            Self::SiteDisabled { coming_soon_path } => {
                Redirect::to(&coming_soon_path).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::header;

    use super::*;

    #[test]
    fn test_tenant_not_found_is_empty_ok() {
        let response = PipelineError::TenantNotFound {
            host: "nowhere.example.com".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::LOCATION).is_none());
    }

    #[test]
    fn test_authentication_required_redirects_to_sign_in() {
        let response = PipelineError::AuthenticationRequired {
            sign_in_path: "/users/sign_in".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/users/sign_in"
        );
    }

    #[test]
    fn test_authorization_denied_redirects_without_failing() {
        let response = PipelineError::AuthorizationDenied {
            redirect_to: "/en/index".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/en/index");
    }

    #[test]
    fn test_site_disabled_redirects_to_coming_soon() {
        let response = PipelineError::SiteDisabled {
            coming_soon_path: "/fr/coming_soon".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/fr/coming_soon"
        );
    }
}
