//! Backup record data access

use crate::{error::AppError, models::backup::BackupRecord};
use chrono::Utc;
use sqlx::SqlitePool;

pub struct BackupRepository {
    db: SqlitePool,
}

impl BackupRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn insert(
        &self,
        backup_type: &str,
        file_path: &str,
        size_bytes: Option<i64>,
    ) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO backups (backup_type, file_path, created_at, size_bytes)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(backup_type)
        .bind(file_path)
        .bind(Utc::now())
        .bind(size_bytes)
        .fetch_one(&self.db)
        .await?;

        Ok(id)
    }

    pub async fn list(&self) -> Result<Vec<BackupRecord>, AppError> {
        let backups = sqlx::query_as::<_, BackupRecord>(
            "SELECT * FROM backups ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(backups)
    }
}
