use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};

use super::Account;

/// The account resolved for the current request.
///
/// Inserted as a request extension by the account resolver, which runs
/// around every request. Handlers and later interceptors extract it
/// instead of re-resolving the tenant.
///
/// # Example
/// ```rust,ignore
/// use mantle::account::current_account::CurrentAccount;
///
/// pub async fn landing(account: CurrentAccount) -> String {
///     format!("Welcome to {}", account.account_prefix)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Arc<Account>);

impl std::ops::Deref for CurrentAccount {
    type Target = Account;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Extraction fails only when the account resolver did not run, which
/// means the route was mounted outside the pipeline.
#[derive(Debug)]
pub struct AccountNotResolved;

impl IntoResponse for AccountNotResolved {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, "Account not resolved").into_response()
    }
}

impl<S> FromRequestParts<S> for CurrentAccount
where
    S: Send + Sync,
{
    type Rejection = AccountNotResolved;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentAccount>()
            .cloned()
            .ok_or(AccountNotResolved)
    }
}
