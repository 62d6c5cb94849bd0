//! Configuration system.
//! Everything is loaded from environment variables; secrets are wrapped in
//! `Secret` so they never end up in logs.

use config::{Config, ConfigError, Environment};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen address, e.g. "0.0.0.0:3000"
    pub addr: String,
    /// Graceful shutdown timeout in seconds
    pub graceful_shutdown_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: String,
    /// Directory backup copies are written to
    pub backup_dir: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Log format: json, pretty
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Token signing key. No default: a missing key aborts startup.
    pub jwt_secret: Secret<String>,
    /// Bearer token lifetime in seconds
    pub token_ttl_secs: u64,
    /// Password policy
    pub password_min_length: usize,
    pub password_require_uppercase: bool,
    pub password_require_digit: bool,
    pub password_require_special: bool,
    /// Sliding-window login rate limit, per username, per process
    pub login_max_attempts: u32,
    pub login_window_secs: u64,
    /// Whether to trust X-Forwarded-For / X-Real-IP headers
    pub trust_proxy: bool,
    /// Provision the built-in demo users at startup
    pub seed_default_users: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
}

impl AppConfig {
    /// Load configuration from environment variables (prefix `CITADEL_`).
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Config::builder();

        settings = settings
            .set_default("server.addr", "0.0.0.0:3000")?
            .set_default("server.graceful_shutdown_timeout_secs", 30)?
            .set_default("database.path", "citadel.db")?
            .set_default("database.backup_dir", "backups")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            .set_default("security.token_ttl_secs", 1800)?
            .set_default("security.password_min_length", 8)?
            .set_default("security.password_require_uppercase", true)?
            .set_default("security.password_require_digit", true)?
            .set_default("security.password_require_special", false)?
            .set_default("security.login_max_attempts", 10)?
            .set_default("security.login_window_secs", 60)?
            .set_default("security.trust_proxy", true)?
            .set_default("security.seed_default_users", false)?;

        settings = settings.add_source(
            Environment::with_prefix("CITADEL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = settings.build()?.try_deserialize()?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                )))
            }
        }

        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log format: {}. Must be one of: json, pretty",
                    self.logging.format
                )))
            }
        }

        if self.database.max_connections < self.database.min_connections {
            return Err(ConfigError::Message(
                "max_connections must be >= min_connections".to_string(),
            ));
        }

        // HS256 needs a key of at least 32 bytes
        if self.security.jwt_secret.expose_secret().len() < 32 {
            return Err(ConfigError::Message(
                "JWT secret must be at least 32 characters long".to_string(),
            ));
        }

        // A zero TTL would issue tokens that are expired at birth
        if self.security.token_ttl_secs < 60 || self.security.token_ttl_secs > 86400 {
            return Err(ConfigError::Message(
                "token_ttl_secs must be between 60 and 86400 (1 minute to 24 hours)".to_string(),
            ));
        }

        if self.security.password_min_length < 6 || self.security.password_min_length > 128 {
            return Err(ConfigError::Message(
                "password_min_length must be between 6 and 128".to_string(),
            ));
        }

        if self.security.login_max_attempts < 1 || self.security.login_max_attempts > 100 {
            return Err(ConfigError::Message(
                "login_max_attempts must be between 1 and 100".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var("CITADEL_SECURITY__JWT_SECRET");
        std::env::remove_var("CITADEL_LOGGING__LEVEL");
        std::env::remove_var("CITADEL_SECURITY__TOKEN_TTL_SECS");
    }

    #[test]
    #[serial]
    fn test_missing_jwt_secret_is_fatal() {
        clear_env();

        // No CITADEL_SECURITY__JWT_SECRET in the environment: startup fails.
        let result = AppConfig::from_env();
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_config_defaults() {
        clear_env();
        std::env::set_var(
            "CITADEL_SECURITY__JWT_SECRET",
            "test-secret-key-for-testing-only-32ch",
        );

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.server.addr, "0.0.0.0:3000");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.security.token_ttl_secs, 1800);
        assert!(!config.security.seed_default_users);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_short_jwt_secret_rejected() {
        clear_env();
        std::env::set_var("CITADEL_SECURITY__JWT_SECRET", "too-short");

        let result = AppConfig::from_env();
        assert!(result.is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_zero_token_ttl_rejected() {
        clear_env();
        std::env::set_var(
            "CITADEL_SECURITY__JWT_SECRET",
            "test-secret-key-for-testing-only-32ch",
        );
        std::env::set_var("CITADEL_SECURITY__TOKEN_TTL_SECS", "0");

        let result = AppConfig::from_env();
        assert!(result.is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_log_level_rejected() {
        clear_env();
        std::env::set_var(
            "CITADEL_SECURITY__JWT_SECRET",
            "test-secret-key-for-testing-only-32ch",
        );
        std::env::set_var("CITADEL_LOGGING__LEVEL", "verbose");

        let result = AppConfig::from_env();
        assert!(result.is_err());

        clear_env();
    }
}
