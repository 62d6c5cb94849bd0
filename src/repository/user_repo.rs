//! User repository

use crate::{
    error::AppError,
    models::user::{Role, User},
};
use chrono::Utc;
use sqlx::SqlitePool;

pub struct UserRepository {
    db: SqlitePool,
}

impl UserRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Find an active user by username. Deactivated users are invisible to
    /// lookup and authentication.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE username = ? AND is_active = 1",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// Create a user. The UNIQUE constraint on username is the concurrency
    /// control: a duplicate insert surfaces as `Conflict`, there is no
    /// check-then-insert.
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, role, is_active)
            VALUES (?, ?, ?, 1)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::Conflict("user".to_string()),
            other => other,
        })?;

        Ok(user)
    }

    /// Update the last-login timestamp on successful authentication.
    pub async fn update_last_login(&self, username: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET last_login = ? WHERE username = ?")
            .bind(Utc::now())
            .bind(username)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    pub async fn update_role(&self, username: &str, role: Role) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE users SET role = ? WHERE username = ? AND is_active = 1")
            .bind(role)
            .bind(username)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn update_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE users SET password_hash = ? WHERE username = ? AND is_active = 1")
                .bind(password_hash)
                .bind(username)
                .execute(&self.db)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Soft delete. The row is never physically removed once audit or
    /// session data references the username.
    pub async fn deactivate(&self, username: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE users SET is_active = 0 WHERE username = ? AND is_active = 1")
            .bind(username)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_active(&self) -> Result<Vec<User>, AppError> {
        let users =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE is_active = 1 ORDER BY username")
                .fetch_all(&self.db)
                .await?;

        Ok(users)
    }
}
