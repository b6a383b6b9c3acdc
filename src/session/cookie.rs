use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SessionConfig;

/// Claims carried by the session cookie.
///
/// The cookie holds nothing but a signed session id; all session state
/// stays in the server-side store. `exp`/`iat` are standard JWT timing
/// claims derived from the configured session lifetime.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject - the session id
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Sign a session id into a cookie value.
///
/// # Errors
/// Returns `jsonwebtoken::errors::Error` if token encoding fails
pub fn seal_session_id(
    config: &SessionConfig,
    session_id: Uuid,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + (config.expiration_days * 86400) as usize;

    let claims = SessionClaims {
        sub: session_id.to_string(),
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify a cookie value and recover the session id.
///
/// Tampered, expired, or malformed cookies yield `None`; the caller
/// starts a fresh session rather than failing the request.
#[must_use]
pub fn unseal_session_id(config: &SessionConfig, token: &str) -> Option<Uuid> {
    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .ok()?;

    Uuid::parse_str(&token_data.claims.sub).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SessionConfig {
        SessionConfig {
            secret: "test-secret".to_string(),
            expiration_days: 7,
            cookie_name: "_mantle_session".to_string(),
        }
    }

    #[test]
    fn test_seal_unseal_roundtrip() {
        let config = config();
        let id = Uuid::new_v4();

        let token = seal_session_id(&config, id).unwrap();
        assert_eq!(unseal_session_id(&config, &token), Some(id));
    }

    #[test]
    fn test_unseal_rejects_wrong_secret() {
        let config = config();
        let other = SessionConfig {
            secret: "other-secret".to_string(),
            ..config.clone()
        };

        let token = seal_session_id(&config, Uuid::new_v4()).unwrap();
        assert_eq!(unseal_session_id(&other, &token), None);
    }

    #[test]
    fn test_unseal_rejects_garbage() {
        assert_eq!(unseal_session_id(&config(), "not-a-token"), None);
    }
}
