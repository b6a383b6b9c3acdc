use uuid::Uuid;

pub mod current_account;
pub mod registry;

/// A tenant resolved for the duration of one request.
///
/// Immutable once resolved; every account-derived decision (locale, theme,
/// site gating, transport policy) reads from this snapshot rather than
/// going back to the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    /// Short identifier used for theme lookup and asset namespacing
    pub account_prefix: String,
    /// Host name this account is served under (no port)
    pub host: String,
    pub preferred_default_locale: String,
    pub site_enabled: bool,
    pub ssl_enabled: bool,
}

impl Account {
    /// Default landing page, localized with the account's default locale.
    #[must_use]
    pub fn index_path(&self) -> String {
        format!("/{}/index", self.preferred_default_locale)
    }

    /// Placeholder page shown while the site is disabled.
    #[must_use]
    pub fn coming_soon_path(&self) -> String {
        format!("/{}/coming_soon", self.preferred_default_locale)
    }
}

impl From<crate::database::models::account::Model> for Account {
    fn from(model: crate::database::models::account::Model) -> Self {
        Self {
            id: model.id,
            account_prefix: model.account_prefix,
            host: model.host,
            preferred_default_locale: model.preferred_default_locale,
            site_enabled: model.site_enabled,
            ssl_enabled: model.ssl_enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(locale: &str) -> Account {
        Account {
            id: Uuid::new_v4(),
            account_prefix: "demo".to_string(),
            host: "demo.example.com".to_string(),
            preferred_default_locale: locale.to_string(),
            site_enabled: true,
            ssl_enabled: false,
        }
    }

    #[test]
    fn test_index_path_uses_default_locale() {
        assert_eq!(account("en").index_path(), "/en/index");
        assert_eq!(account("fr").index_path(), "/fr/index");
    }

    #[test]
    fn test_coming_soon_path_uses_default_locale() {
        assert_eq!(account("de").coming_soon_path(), "/de/coming_soon");
    }
}
