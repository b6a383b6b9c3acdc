pub mod current_user;
pub mod identity;
pub mod middleware;

use uuid::Uuid;

use crate::session::store::Session;

/// Where a signed-in visitor lands when no previous URL was tracked.
pub const ROOT_PATH: &str = "/";

/// Mark the session as signed in and return the post-login redirect target.
///
/// The target is the last non-identity URL the visitor touched, tracked by
/// the navigation middleware, falling back to the root path. Credential
/// verification happens in the host application before this is called.
pub fn sign_in(session: &Session, user_id: Uuid) -> String {
    session.set_user_id(Some(user_id));
    session.previous_url().unwrap_or_else(|| ROOT_PATH.to_string())
}

/// Clear the signed-in user from the session.
pub fn sign_out(session: &Session) {
    session.set_user_id(None);
}
