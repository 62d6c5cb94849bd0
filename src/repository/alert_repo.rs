//! Alert data access

use crate::{
    error::AppError,
    models::alert::{Alert, AlertLevel},
};
use chrono::Utc;
use sqlx::{Sqlite, SqlitePool};

pub struct AlertRepository {
    db: SqlitePool,
}

impl AlertRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Insert one alert through any executor; the security logger uses this
    /// inside the same transaction as the underlying audit row.
    pub async fn insert_with<'e, E>(
        executor: E,
        alert_type: &str,
        message: &str,
        level: AlertLevel,
    ) -> Result<i64, AppError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO alerts (alert_type, message, level, timestamp, is_resolved)
            VALUES (?, ?, ?, ?, 0)
            RETURNING id
            "#,
        )
        .bind(alert_type)
        .bind(message)
        .bind(level)
        .bind(Utc::now())
        .fetch_one(executor)
        .await?;

        Ok(id)
    }

    pub async fn insert(
        &self,
        alert_type: &str,
        message: &str,
        level: AlertLevel,
    ) -> Result<i64, AppError> {
        Self::insert_with(&self.db, alert_type, message, level).await
    }

    pub async fn list(&self, include_resolved: bool) -> Result<Vec<Alert>, AppError> {
        let query = if include_resolved {
            "SELECT * FROM alerts ORDER BY timestamp DESC, id DESC"
        } else {
            "SELECT * FROM alerts WHERE is_resolved = 0 ORDER BY timestamp DESC, id DESC"
        };

        let alerts = sqlx::query_as::<_, Alert>(query).fetch_all(&self.db).await?;

        Ok(alerts)
    }

    /// Mark an alert resolved. One-way: an already resolved alert is left
    /// untouched and reported as not found.
    pub async fn resolve(&self, id: i64, resolved_by: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE alerts
            SET is_resolved = 1, resolved_by = ?, resolved_at = ?
            WHERE id = ? AND is_resolved = 0
            "#,
        )
        .bind(resolved_by)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_unresolved(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM alerts WHERE is_resolved = 0")
            .fetch_one(&self.db)
            .await?;

        Ok(count)
    }
}
