//! Database pool and migration management for the SQLite store.

use crate::config::DatabaseConfig;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;
use std::time::Duration;

/// Create the connection pool, creating the database file if missing.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, DbError> {
    tracing::debug!(path = %config.path, "Creating database connection pool...");

    let mut options = SqliteConnectOptions::from_str(&connect_url(&config.path))
        .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .foreign_keys(true);

    // Readers and writers must not block each other; the store's own locking
    // is the sole serialization point. WAL does not apply to in-memory
    // databases (used by tests).
    if !config.path.contains(":memory:") {
        options = options.journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create database pool: {}", e);
            DbError::ConnectionFailed(e.to_string())
        })?;

    tracing::info!(
        path = %config.path,
        max_connections = config.max_connections,
        "Database pool created successfully"
    );

    Ok(pool)
}

/// Run pending migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
    tracing::info!("Running database migrations...");

    sqlx::migrate!("./migrations").run(pool).await.map_err(|e| {
        tracing::error!("Migration failed: {}", e);
        DbError::MigrationFailed(e.to_string())
    })?;

    tracing::info!("Migrations completed successfully");
    Ok(())
}

/// Database health check.
pub async fn health_check(pool: &SqlitePool) -> HealthStatus {
    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => {
            tracing::debug!("Database health check: OK");
            HealthStatus::Healthy
        }
        Err(e) => {
            tracing::warn!("Database health check failed: {}", e);
            HealthStatus::Unhealthy(e.to_string())
        }
    }
}

fn connect_url(path: &str) -> String {
    if path.starts_with("sqlite:") {
        path.to_string()
    } else {
        format!("sqlite://{}", path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

#[derive(Debug, Clone)]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_url() {
        assert_eq!(connect_url("citadel.db"), "sqlite://citadel.db");
        assert_eq!(connect_url("sqlite::memory:"), "sqlite::memory:");
    }

    #[tokio::test]
    async fn test_in_memory_pool_and_migrations() {
        let config = DatabaseConfig {
            path: "sqlite::memory:".to_string(),
            backup_dir: "backups".to_string(),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout_secs: 5,
        };

        let pool = create_pool(&config).await.expect("pool creation failed");
        run_migrations(&pool).await.expect("migrations failed");

        match health_check(&pool).await {
            HealthStatus::Healthy => {}
            HealthStatus::Unhealthy(msg) => panic!("unexpected unhealthy status: {}", msg),
        }
    }
}
