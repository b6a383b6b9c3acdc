use std::sync::Arc;

use dashmap::DashMap;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};
use thiserror::Error;
use tracing::{debug, info};

use super::Account;
use crate::database::models::account;

/// Raised when no account matches the request host.
#[derive(Debug, Error)]
#[error("no account registered for host {host:?}")]
pub struct TenantNotFound {
    pub host: String,
}

/// Process-wide tenant registry keyed by request host.
///
/// Read-mostly: populated at boot (and on explicit reload), read once per
/// request by the account resolver. Lookups return shared snapshots so a
/// reload cannot mutate an account mid-request.
#[derive(Clone, Debug, Default)]
pub struct AccountRegistry {
    accounts: Arc<DashMap<String, Arc<Account>>>,
}

impl AccountRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the account serving `host`. Ports are ignored so that
    /// `demo.example.com:3000` and `demo.example.com` hit the same tenant.
    pub fn resolve(&self, host: &str) -> Result<Arc<Account>, TenantNotFound> {
        let host = host.split(':').next().unwrap_or(host);

        self.accounts
            .get(host)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| TenantNotFound {
                host: host.to_string(),
            })
    }

    pub fn insert(&self, account: Account) {
        self.accounts
            .insert(account.host.clone(), Arc::new(account));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Replace the registry contents with the accounts currently persisted.
    ///
    /// Called at boot before the server starts accepting traffic.
    pub async fn reload_from(&self, db: &DatabaseConnection) -> Result<usize, DbErr> {
        debug!("Loading accounts into the tenant registry");

        let models = account::Entity::find().all(db).await?;
        let count = models.len();

        self.accounts.clear();
        for model in models {
            self.insert(Account::from(model));
        }

        info!(accounts = count, "Tenant registry loaded");
        Ok(count)
    }
}
