use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use thiserror::Error;
use uuid::Uuid;

/// Snapshot of a signed-in user, loaded once per request.
///
/// Role names and the admin flag are the whole capability contract this
/// crate relies on; everything else about users belongs to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub admin: bool,
    pub roles: Vec<String>,
    pub last_access: Option<DateTime<Utc>>,
}

impl AuthenticatedUser {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.admin
    }

    #[must_use]
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|role| role == name)
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity backend unavailable: {0}")]
    Backend(String),
}

/// The host application's user backend.
///
/// `mantle` never verifies credentials; it only asks the provider who a
/// session's user is and records their last access.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn user_for(&self, user_id: Uuid) -> Result<Option<AuthenticatedUser>, IdentityError>;

    async fn touch_last_access(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), IdentityError>;
}

/// In-memory identity provider for tests and examples.
#[derive(Debug, Default)]
pub struct MockIdentity {
    users: DashMap<Uuid, AuthenticatedUser>,
}

impl MockIdentity {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: AuthenticatedUser) {
        self.users.insert(user.id, user);
    }

    #[must_use]
    pub fn into_provider(self) -> Arc<dyn IdentityProvider> {
        Arc::new(self)
    }
}

#[async_trait]
impl IdentityProvider for MockIdentity {
    async fn user_for(&self, user_id: Uuid) -> Result<Option<AuthenticatedUser>, IdentityError> {
        Ok(self.users.get(&user_id).map(|entry| entry.value().clone()))
    }

    async fn touch_last_access(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), IdentityError> {
        if let Some(mut entry) = self.users.get_mut(&user_id) {
            entry.last_access = Some(at);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(admin: bool, roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            email: "member@example.com".to_string(),
            admin,
            roles: roles.iter().map(ToString::to_string).collect(),
            last_access: None,
        }
    }

    #[test]
    fn test_has_role() {
        let user = user(false, &["beta", "editor"]);
        assert!(user.has_role("beta"));
        assert!(!user.has_role("admin"));
    }

    #[tokio::test]
    async fn test_mock_identity_lookup_and_touch() {
        let identity = MockIdentity::new();
        let user = user(true, &[]);
        let id = user.id;
        identity.insert(user);

        let loaded = identity.user_for(id).await.unwrap().unwrap();
        assert!(loaded.is_admin());
        assert!(loaded.last_access.is_none());

        let now = Utc::now();
        identity.touch_last_access(id, now).await.unwrap();
        let touched = identity.user_for(id).await.unwrap().unwrap();
        assert_eq!(touched.last_access, Some(now));
    }

    #[tokio::test]
    async fn test_mock_identity_unknown_user() {
        let identity = MockIdentity::new();
        assert!(identity.user_for(Uuid::new_v4()).await.unwrap().is_none());
    }
}
