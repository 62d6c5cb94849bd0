//! Session domain model

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One live issued token. Only the token's SHA-256 fingerprint is stored;
/// the registry cannot reconstruct the token itself.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Session {
    pub id: i64,
    pub username: String,
    pub token_fingerprint: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}
