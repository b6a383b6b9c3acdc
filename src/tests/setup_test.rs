use std::{collections::HashMap, sync::Arc};

use axum::{
    http::{header, HeaderName, HeaderValue},
    Router,
};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::{
    account::{registry::AccountRegistry, Account},
    app::App,
    audit::{ActivityRecord, AuditSink},
    auth::identity::{AuthenticatedUser, MockIdentity},
    config::{
        AuthConfig, Config, DatabaseConfig, EmailConfig, ServerConfig, SessionConfig,
        ThemesConfig, TracingConfig,
    },
    environment::Environment,
    mailer::Mailer,
    pipeline::{protocol, theme::ThemeRegistry},
    router::router,
    session::{cookie, store::FlashMessage, store::SessionStore},
};

/// Fixture tenants. One host per behavior under test: the default
/// account, a French-locale account, a disabled site, and an SSL-only
/// site.
pub const DEMO_HOST: &str = "demo.example.com";
pub const PARIS_HOST: &str = "paris.example.com";
pub const DISABLED_HOST: &str = "soon.example.com";
pub const SECURE_HOST: &str = "secure.example.com";

/// Everything a pipeline test needs: a test server, the app state behind
/// it, and the fixture users.
pub struct TestUtils {
    pub server: axum_test::TestServer,
    pub app: App,
    pub admin: AuthenticatedUser,
    pub beta: AuthenticatedUser,
    pub member: AuthenticatedUser,
}

/// Build a test server in production mode, where the whole pipeline
/// (activity recording and transport enforcement included) is active.
///
/// All collaborators are in-memory: mock identity, mock audit sink, mock
/// mailer, and a pre-loaded tenant registry. No database is touched.
pub async fn setup_test(app_router: fn(App) -> Router) -> TestUtils {
    setup_test_in(Environment::Production, app_router).await
}

pub async fn setup_test_in(environment: Environment, app_router: fn(App) -> Router) -> TestUtils {
    let config = test_config();

    let identity = MockIdentity::new();
    let admin = fixture_user("admin@example.com", true, &[]);
    let beta = fixture_user("beta@example.com", false, &["beta"]);
    let member = fixture_user("member@example.com", false, &[]);
    identity.insert(admin.clone());
    identity.insert(beta.clone());
    identity.insert(member.clone());

    let accounts = AccountRegistry::new();
    accounts.insert(fixture_account("demo", DEMO_HOST, "en", true, false));
    accounts.insert(fixture_account("paris", PARIS_HOST, "fr", true, false));
    accounts.insert(fixture_account("soon", DISABLED_HOST, "en", false, false));
    accounts.insert(fixture_account("secure", SECURE_HOST, "en", true, true));

    let app = App {
        themes: ThemeRegistry::from_config(&config.themes),
        config,
        environment,
        db: DatabaseConnection::default(),
        mailer: Mailer::mock(),
        accounts,
        sessions: SessionStore::new(),
        audit: AuditSink::mock(),
        identity: Arc::new(identity),
        transport_policy: protocol::require_secure,
    };

    let server = axum_test::TestServer::new(router(app.clone(), app_router))
        .expect("Failed to create test server");

    TestUtils {
        server,
        app,
        admin,
        beta,
        member,
    }
}

impl TestUtils {
    /// Records captured by the mock audit sink, in arrival order.
    pub fn recorded_activities(&self) -> Vec<ActivityRecord> {
        self.app
            .audit
            .records()
            .expect("Mock audit sink should be used in tests")
    }

    /// Get sent emails from the mock mailer.
    pub fn sent_emails(&self) -> Vec<lettre::Message> {
        self.app
            .mailer
            .messages()
            .expect("Mock mailer should be used in tests")
    }

    /// A signed session cookie, optionally pre-authenticated as `user_id`.
    pub fn session_cookie(&self, user_id: Option<Uuid>) -> (HeaderName, HeaderValue) {
        let session = self.app.sessions.create();
        session.set_user_id(user_id);

        let token = cookie::seal_session_id(&self.app.config.session, session.id())
            .expect("Failed to sign session cookie");
        let value = format!("{}={}", self.app.config.session.cookie_name, token);

        (
            header::COOKIE,
            HeaderValue::from_str(&value).expect("Invalid cookie value"),
        )
    }

    /// All pending flash messages across live sessions.
    pub fn flash_messages(&self) -> Vec<FlashMessage> {
        self.app
            .sessions
            .snapshot()
            .iter()
            .flat_map(|session| session.peek_flash())
            .collect()
    }
}

fn fixture_account(
    prefix: &str,
    host: &str,
    locale: &str,
    site_enabled: bool,
    ssl_enabled: bool,
) -> Account {
    Account {
        id: Uuid::new_v4(),
        account_prefix: prefix.to_string(),
        host: host.to_string(),
        preferred_default_locale: locale.to_string(),
        site_enabled,
        ssl_enabled,
    }
}

fn fixture_user(email: &str, admin: bool, roles: &[&str]) -> AuthenticatedUser {
    AuthenticatedUser {
        id: Uuid::new_v4(),
        email: email.to_string(),
        admin,
        roles: roles.iter().map(ToString::to_string).collect(),
        last_access: None,
    }
}

fn test_config() -> Config {
    let mut themes = HashMap::new();
    themes.insert("demo".to_string(), "midnight".to_string());

    Config {
        tracing: TracingConfig {
            log_level: "warn".to_string(),
        },
        database: DatabaseConfig {
            url: "postgresql://localhost/unused".to_string(),
            pool_size: 1,
        },
        server: ServerConfig { port: 0 },
        email: EmailConfig::Mock,
        base_url: "http://demo.example.com".to_string(),
        session: SessionConfig {
            secret: "test-secret".to_string(),
            expiration_days: 7,
            cookie_name: "_mantle_session".to_string(),
        },
        themes: ThemesConfig {
            enabled: true,
            default_theme: "standard".to_string(),
            themes,
        },
        auth: AuthConfig::default(),
    }
}
