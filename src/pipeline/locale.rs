use std::{collections::HashMap, fmt, sync::LazyLock};

use axum::{
    extract::{Query, Request},
    http::{header, Uri},
    middleware::Next,
    response::Response,
};
use regex::Regex;

use super::protocol;
use crate::account::{current_account::CurrentAccount, Account};

/// Effective locale for the request, e.g. `en` or `pt-BR`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request-scoped values for building absolute and localized URLs.
///
/// Threaded explicitly to link building and the mailer; there is no
/// process-global URL configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlOptions {
    pub scheme: String,
    pub host: String,
    pub locale: String,
}

impl UrlOptions {
    /// Prefix `path` with the effective locale: `lessons` -> `/en/lessons`.
    #[must_use]
    pub fn localized_path(&self, path: &str) -> String {
        format!("/{}/{}", self.locale, path.trim_start_matches('/'))
    }

    /// Absolute, localized URL on the request's own host and scheme.
    #[must_use]
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}://{}{}", self.scheme, self.host, self.localized_path(path))
    }
}

static LOCALE_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2}(-[A-Z]{2})?$").unwrap());

/// Derives the effective locale and URL options for the request.
///
/// Runs after account resolution: the explicit request locale (leading
/// path segment or `locale` query parameter) wins, the account default
/// fills in otherwise.
pub async fn resolve_locale(mut req: Request, next: Next) -> Response {
    let Some(account) = req.extensions().get::<CurrentAccount>().cloned() else {
        return next.run(req).await;
    };

    let locale = effective_locale(req.uri(), &account);

    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(&account.host)
        .to_string();

    let url_options = UrlOptions {
        scheme: protocol::request_scheme(&req),
        host,
        locale: locale.0.clone(),
    };

    req.extensions_mut().insert(locale);
    req.extensions_mut().insert(url_options);

    next.run(req).await
}

/// Explicit locale carried by the request itself, if any.
fn explicit_locale(uri: &Uri) -> Option<String> {
    let segment = uri
        .path()
        .trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or_default();

    if LOCALE_SEGMENT.is_match(segment) {
        return Some(segment.to_string());
    }

    Query::<HashMap<String, String>>::try_from_uri(uri)
        .ok()
        .and_then(|Query(params)| params.get("locale").cloned())
        .filter(|locale| !locale.is_empty())
}

pub(crate) fn effective_locale(uri: &Uri, account: &Account) -> Locale {
    Locale(explicit_locale(uri).unwrap_or_else(|| account.preferred_default_locale.clone()))
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

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
    fn test_account_default_when_no_explicit_locale() {
        let uri = Uri::from_static("/lessons?page=2");
        assert_eq!(effective_locale(&uri, &account("fr")).0, "fr");
    }

    #[test]
    fn test_path_segment_wins() {
        let uri = Uri::from_static("/en/lessons");
        assert_eq!(effective_locale(&uri, &account("fr")).0, "en");
    }

    #[test]
    fn test_query_parameter_wins_over_account_default() {
        let uri = Uri::from_static("/lessons?locale=es");
        assert_eq!(effective_locale(&uri, &account("fr")).0, "es");
    }

    #[test]
    fn test_empty_query_parameter_is_ignored() {
        let uri = Uri::from_static("/lessons?locale=");
        assert_eq!(effective_locale(&uri, &account("fr")).0, "fr");
    }

    #[test]
    fn test_region_qualified_segment() {
        let uri = Uri::from_static("/pt-BR/lessons");
        assert_eq!(effective_locale(&uri, &account("en")).0, "pt-BR");
    }

    #[test]
    fn test_non_locale_segment_falls_through() {
        let uri = Uri::from_static("/lessons/intro");
        assert_eq!(effective_locale(&uri, &account("en")).0, "en");
    }

    #[test]
    fn test_url_options_building() {
        let options = UrlOptions {
            scheme: "https".to_string(),
            host: "demo.example.com".to_string(),
            locale: "en".to_string(),
        };

        assert_eq!(options.localized_path("lessons"), "/en/lessons");
        assert_eq!(options.localized_path("/lessons"), "/en/lessons");
        assert_eq!(
            options.absolute_url("lessons"),
            "https://demo.example.com/en/lessons"
        );
    }
}
