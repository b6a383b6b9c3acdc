use std::collections::HashMap;

use lettre::message::Mailbox;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub tracing: TracingConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub email: EmailConfig,
    pub base_url: String,
    pub session: SessionConfig,
    #[serde(default)]
    pub themes: ThemesConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Secret used to sign the session-id cookie
    pub secret: String,
    pub expiration_days: u64,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

fn default_cookie_name() -> String {
    "_mantle_session".to_string()
}

/// Theming is disabled unless a host application opts in; when enabled,
/// accounts are mapped to themes by their prefix with a fallback default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemesConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_theme")]
    pub default_theme: String,
    /// Account prefix -> theme name overrides
    #[serde(default)]
    pub themes: HashMap<String, String>,
}

fn default_theme() -> String {
    "standard".to_string()
}

impl Default for ThemesConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            default_theme: default_theme(),
            themes: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Where the authentication gate sends visitors who are not signed in
    #[serde(default = "default_sign_in_path")]
    pub sign_in_path: String,
}

fn default_sign_in_path() -> String {
    "/users/sign_in".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            sign_in_path: default_sign_in_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EmailConfig {
    /// Mock mailer that captures emails for testing
    Mock,
    /// Real SMTP configuration for sending emails
    Smtp {
        host: String,
        port: u16,
        #[serde(deserialize_with = "deserialize_mailbox")]
        sender: Mailbox,
        username: Option<String>,
        password: Option<String>,
        #[serde(default = "default_use_tls")]
        use_tls: bool,
    },
}

impl EmailConfig {
    /// Sender mailbox, with a placeholder for the mock transport.
    #[must_use]
    pub fn sender(&self) -> Mailbox {
        match self {
            Self::Smtp { sender, .. } => sender.clone(),
            Self::Mock => "noreply@example.com".parse().expect("Invalid mock sender"),
        }
    }
}

fn deserialize_mailbox<'de, D>(deserializer: D) -> Result<Mailbox, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}

fn default_use_tls() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TracingConfig {
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}
