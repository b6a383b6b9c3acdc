use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;

use crate::{account::current_account::CurrentAccount, app::App, config::ThemesConfig};

/// UI theme selected for the request, consumed by the render collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme(pub String);

/// Maps account prefixes to themes, with a fallback default.
///
/// Populated from configuration at boot. When theming is disabled the
/// resolver is a no-op and no theme extension is inserted.
#[derive(Clone, Debug)]
pub struct ThemeRegistry {
    themes: Arc<DashMap<String, String>>,
    default_theme: String,
    enabled: bool,
}

impl ThemeRegistry {
    #[must_use]
    pub fn from_config(config: &ThemesConfig) -> Self {
        let themes = DashMap::new();
        for (prefix, theme) in &config.themes {
            themes.insert(prefix.clone(), theme.clone());
        }

        Self {
            themes: Arc::new(themes),
            default_theme: config.default_theme.clone(),
            enabled: config.enabled,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Theme for an account prefix, falling back to the default theme.
    #[must_use]
    pub fn theme_for(&self, prefix: &str) -> Theme {
        Theme(
            self.themes
                .get(prefix)
                .map_or_else(|| self.default_theme.clone(), |entry| entry.value().clone()),
        )
    }
}

/// Selects the theme for the resolved account when theming is enabled.
pub async fn resolve_theme(State(app): State<App>, mut req: Request, next: Next) -> Response {
    if app.themes.enabled() {
        if let Some(account) = req.extensions().get::<CurrentAccount>().cloned() {
            let theme = app.themes.theme_for(&account.account_prefix);
            req.extensions_mut().insert(theme);
        }
    }

    next.run(req).await
}
