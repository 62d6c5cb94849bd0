//! Shared test helpers.

use citadel::{
    auth::PasswordHasher,
    config::{AppConfig, DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig},
    db,
    middleware::AppState,
    models::user::Role,
    routes,
};
use secrecy::Secret;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Test configuration over an in-memory database.
pub fn create_test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(),
            graceful_shutdown_timeout_secs: 5,
        },
        database: DatabaseConfig {
            path: ":memory:".to_string(),
            backup_dir: std::env::temp_dir()
                .join("citadel-test-backups")
                .to_string_lossy()
                .to_string(),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout_secs: 5,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            jwt_secret: Secret::new("test-secret-key-for-testing-only-min-32-chars".to_string()),
            token_ttl_secs: 300,
            password_min_length: 4,
            password_require_uppercase: false,
            password_require_digit: false,
            password_require_special: false,
            login_max_attempts: 5,
            login_window_secs: 60,
            trust_proxy: false,
            seed_default_users: false,
        },
    }
}

/// In-memory SQLite pool with migrations applied. A single connection is
/// mandatory: each new connection to `:memory:` would be a fresh database.
pub async fn setup_test_db(config: &AppConfig) -> SqlitePool {
    let pool = db::create_pool(&config.database)
        .await
        .expect("Failed to create test database pool");

    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub fn create_test_app_state(config: AppConfig, pool: SqlitePool) -> Arc<AppState> {
    routes::build_state(Arc::new(config), pool).expect("Failed to build app state")
}

/// Insert a user with a properly hashed password.
pub async fn create_test_user(pool: &SqlitePool, username: &str, password: &str, role: Role) {
    let hasher = PasswordHasher::new();
    let password_hash = hasher.hash(password).expect("Failed to hash password");

    sqlx::query(
        r#"
        INSERT INTO users (username, password_hash, role, is_active, created_at)
        VALUES (?, ?, ?, 1, ?)
        "#,
    )
    .bind(username)
    .bind(&password_hash)
    .bind(role)
    .bind(chrono::Utc::now())
    .execute(pool)
    .await
    .expect("Failed to insert test user");
}
