//! Database backup and restore.
//!
//! Backups are plain file copies of the SQLite database into the configured
//! backup directory, each one recorded in the `backups` table. A restore
//! snapshots the current database first so the operation can be undone.

use crate::{config::DatabaseConfig, error::AppError, models::backup::BackupRecord, repository::BackupRepository};
use chrono::Utc;
use std::path::{Path, PathBuf};

pub struct BackupService {
    db: sqlx::SqlitePool,
    db_path: PathBuf,
    backup_dir: PathBuf,
}

impl BackupService {
    pub fn new(db: sqlx::SqlitePool, config: &DatabaseConfig) -> Self {
        Self {
            db,
            db_path: PathBuf::from(&config.path),
            backup_dir: PathBuf::from(&config.backup_dir),
        }
    }

    /// Copy the database into the backup directory and record it.
    pub async fn create_backup(&self, initiated_by: &str) -> Result<BackupRecord, AppError> {
        let dest = self
            .backup_dir
            .join(format!("backup_{}.db", Utc::now().format("%Y%m%d_%H%M%S")));

        let size = self.copy_database(&dest).await?;
        let file_path = dest.to_string_lossy().to_string();

        let id = BackupRepository::new(self.db.clone())
            .insert("manual", &file_path, Some(size))
            .await?;

        tracing::info!(
            backup_id = id,
            path = %file_path,
            size_bytes = size,
            initiated_by = %initiated_by,
            "Database backup created"
        );

        Ok(BackupRecord {
            id,
            backup_type: "manual".to_string(),
            file_path,
            created_at: Utc::now(),
            size_bytes: Some(size),
        })
    }

    /// Replace the live database with a previous backup.
    ///
    /// The current database is snapshotted into the backup directory first,
    /// and that snapshot is recorded as a `pre_restore` backup.
    pub async fn restore_backup(
        &self,
        backup_path: &str,
        initiated_by: &str,
    ) -> Result<(), AppError> {
        let source = Path::new(backup_path);
        if !source.exists() {
            return Err(AppError::NotFound);
        }

        let snapshot = self
            .backup_dir
            .join(format!("pre_restore_{}.db", Utc::now().format("%Y%m%d_%H%M%S")));
        let size = self.copy_database(&snapshot).await?;

        BackupRepository::new(self.db.clone())
            .insert("pre_restore", &snapshot.to_string_lossy(), Some(size))
            .await?;

        tokio::fs::copy(source, &self.db_path)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, path = %backup_path, "Restore failed");
                AppError::Internal
            })?;

        tracing::warn!(
            path = %backup_path,
            initiated_by = %initiated_by,
            "Database restored from backup"
        );

        Ok(())
    }

    pub async fn list_backups(&self) -> Result<Vec<BackupRecord>, AppError> {
        BackupRepository::new(self.db.clone()).list().await
    }

    async fn copy_database(&self, dest: &Path) -> Result<i64, AppError> {
        tokio::fs::create_dir_all(&self.backup_dir)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, dir = %self.backup_dir.display(), "Cannot create backup directory");
                AppError::Internal
            })?;

        let bytes = tokio::fs::copy(&self.db_path, dest).await.map_err(|e| {
            tracing::error!(error = %e, dest = %dest.display(), "Database copy failed");
            AppError::Internal
        })?;

        Ok(bytes as i64)
    }
}
