//! Resource domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Managed resource record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Resource {
    pub id: i64,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
}

pub const RESOURCE_STATUSES: &[&str] = &["active", "maintenance", "inactive"];

/// Create/update resource request
#[derive(Debug, Deserialize, Validate)]
pub struct ResourceRequest {
    #[validate(length(min = 2, max = 100, message = "name must be 2-100 characters"))]
    #[validate(custom(function = "validate_name_chars"))]
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "validate_status"))]
    pub status: String,
}

fn validate_name_chars(name: &str) -> Result<(), validator::ValidationError> {
    const DANGEROUS: &[char] = &['<', '>', '&', '"', '\'', ';'];
    if name.chars().any(|c| DANGEROUS.contains(&c)) {
        return Err(validator::ValidationError::new("forbidden_characters"));
    }
    Ok(())
}

fn validate_status(status: &str) -> Result<(), validator::ValidationError> {
    if !RESOURCE_STATUSES.contains(&status.to_lowercase().as_str()) {
        return Err(validator::ValidationError::new("invalid_status"));
    }
    Ok(())
}
