//! Bearer token issue/verification (HS256 JWT) and token fingerprinting

use crate::{config::AppConfig, error::AppError, models::user::Role};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Identity claims embedded in every issued token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Role at issue time
    pub role: Role,

    /// Issued at
    pub iat: i64,

    /// Expiration
    pub exp: i64,

    /// Unique token identifier
    pub jti: String,
}

/// Token issuer/verifier. The signing key is process-wide configuration
/// loaded once at startup.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    default_ttl_secs: u64,
}

impl TokenService {
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let secret = config.security.jwt_secret.expose_secret();

        // The missing-key case already failed config deserialization; this
        // guards direct construction with a weak key.
        if secret.len() < 32 {
            return Err(AppError::Config(
                "JWT secret too short (min 32 chars)".to_string(),
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            default_ttl_secs: config.security.token_ttl_secs,
        })
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::seconds(self.default_ttl_secs as i64)
    }

    /// Issue a signed token for `username` with the given lifetime.
    /// Returns the token and its expiry instant.
    pub fn issue(
        &self,
        username: &str,
        role: Role,
        ttl: Duration,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let expires_at = now + ttl;

        let claims = Claims {
            sub: username.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode token: {:?}", e);
            AppError::Internal
        })?;

        Ok((token, expires_at))
    }

    /// Validate signature and expiration. Corruption, signature mismatch and
    /// expiry all collapse into the same `Unauthorized` so the response does
    /// not reveal which check failed.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!("Token validation failed: {:?}", e);
                AppError::Unauthorized
            })?
            .claims)
    }
}

/// Deterministic one-way digest of a bearer token. The same token always
/// maps to the same fingerprint, but the token cannot be recovered from it.
pub fn fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig};
    use secrecy::Secret;

    fn test_config() -> AppConfig {
        AppConfig {
            server: ServerConfig {
                addr: "127.0.0.1:3000".to_string(),
                graceful_shutdown_timeout_secs: 30,
            },
            database: DatabaseConfig {
                path: "sqlite::memory:".to_string(),
                backup_dir: "backups".to_string(),
                max_connections: 1,
                min_connections: 1,
                acquire_timeout_secs: 5,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
            },
            security: SecurityConfig {
                jwt_secret: Secret::new("test-secret-key-for-testing-only-32ch".to_string()),
                token_ttl_secs: 1800,
                password_min_length: 8,
                password_require_uppercase: true,
                password_require_digit: true,
                password_require_special: false,
                login_max_attempts: 10,
                login_window_secs: 60,
                trust_proxy: false,
                seed_default_users: false,
            },
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let service = TokenService::from_config(&test_config()).unwrap();

        let (token, expires_at) = service
            .issue("wayne", Role::Admin, Duration::minutes(30))
            .unwrap();

        assert!(expires_at > Utc::now());

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, "wayne");
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_garbage_token_fails() {
        let service = TokenService::from_config(&test_config()).unwrap();
        assert!(matches!(
            service.verify("not-a-token"),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_expired_token_fails() {
        let service = TokenService::from_config(&test_config()).unwrap();

        let (token, _) = service
            .issue("wayne", Role::Admin, Duration::seconds(0))
            .unwrap();

        // Zero leeway: once past the exp instant the token is dead.
        std::thread::sleep(std::time::Duration::from_millis(1100));
        assert!(matches!(
            service.verify(&token),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_tampered_token_fails() {
        let service = TokenService::from_config(&test_config()).unwrap();
        let (token, _) = service
            .issue("wayne", Role::Admin, Duration::minutes(30))
            .unwrap();

        let mut tampered = token.clone();
        tampered.pop();
        tampered.push('A');
        assert!(service.verify(&tampered).is_err());
    }

    #[test]
    fn test_fingerprint_deterministic_and_opaque() {
        let fp1 = fingerprint("some.bearer.token");
        let fp2 = fingerprint("some.bearer.token");
        let other = fingerprint("another.token");

        assert_eq!(fp1, fp2);
        assert_ne!(fp1, other);
        // SHA-256 hex
        assert_eq!(fp1.len(), 64);
        assert!(!fp1.contains("bearer"));
    }
}
