//! Session registry.
//!
//! Tracks which issued tokens are currently valid, independent of token
//! signature validity. This is what makes logout effective immediately: a
//! signed token stays cryptographically valid until its natural expiry, but
//! without a matching unexpired fingerprint here it resolves to nothing.

use crate::{error::AppError, models::session::Session};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SessionRepository {
    db: SqlitePool,
}

impl SessionRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Record a newly issued token.
    pub async fn register(
        &self,
        username: &str,
        token_fingerprint: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO sessions (username, token_fingerprint, created_at, expires_at, last_activity)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(username)
        .bind(token_fingerprint)
        .bind(now)
        .bind(expires_at)
        .bind(now)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// True iff a matching fingerprint exists with an expiry in the future.
    /// Expired-but-present rows read as invalid; the read path never
    /// mutates, expired rows are left for `reap_expired`.
    pub async fn is_valid(&self, token_fingerprint: &str) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sessions WHERE token_fingerprint = ? AND expires_at > ?",
        )
        .bind(token_fingerprint)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;

        Ok(count > 0)
    }

    /// Fetch a session row regardless of expiry.
    pub async fn find(&self, token_fingerprint: &str) -> Result<Option<Session>, AppError> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE token_fingerprint = ?",
        )
        .bind(token_fingerprint)
        .fetch_optional(&self.db)
        .await?;

        Ok(session)
    }

    /// Remove a session. Idempotent; reports whether a row was removed.
    pub async fn revoke(&self, token_fingerprint: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_fingerprint = ?")
            .bind(token_fingerprint)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete all rows past expiry. Invoked out-of-band as maintenance, not
    /// on the read path.
    pub async fn reap_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(Utc::now())
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
            .fetch_one(&self.db)
            .await?;

        Ok(count)
    }
}
