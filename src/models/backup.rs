//! Backup record model

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BackupRecord {
    pub id: i64,
    pub backup_type: String,
    pub file_path: String,
    pub created_at: DateTime<Utc>,
    pub size_bytes: Option<i64>,
}
