//! Audit trail data access. Append-only: there is no update or delete.

use crate::{
    error::AppError,
    models::audit::{AuditEvent, NewAuditEvent},
};
use chrono::Utc;
use sqlx::{Sqlite, SqlitePool};

pub struct AuditRepository {
    db: SqlitePool,
}

impl AuditRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Insert one audit event through any executor, so callers can place
    /// the write inside a transaction together with an alert.
    pub async fn insert_with<'e, E>(executor: E, event: &NewAuditEvent) -> Result<(), AppError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO audit_log (username, action, resource_type, resource_id, details, timestamp, ip_address, user_agent)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&event.username)
        .bind(&event.action)
        .bind(&event.resource_type)
        .bind(event.resource_id)
        .bind(&event.details)
        .bind(Utc::now())
        .bind(&event.ip_address)
        .bind(&event.user_agent)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn insert(&self, event: &NewAuditEvent) -> Result<(), AppError> {
        Self::insert_with(&self.db, event).await
    }

    pub async fn list_recent(&self, limit: i64) -> Result<Vec<AuditEvent>, AppError> {
        let events = sqlx::query_as::<_, AuditEvent>(
            "SELECT * FROM audit_log ORDER BY timestamp DESC, id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(events)
    }

    pub async fn count_by_action(&self, action: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_log WHERE action = ?")
            .bind(action)
            .fetch_one(&self.db)
            .await?;

        Ok(count)
    }
}
