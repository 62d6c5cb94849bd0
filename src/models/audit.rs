//! Audit domain models

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Append-only audit record. Never updated or deleted, even when the
/// enclosing request is later rejected.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AuditEvent {
    pub id: i64,
    pub username: String,
    pub action: String,
    pub resource_type: Option<String>,
    pub resource_id: Option<i64>,
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// New audit entry, before insertion.
#[derive(Debug, Clone, Default)]
pub struct NewAuditEvent {
    pub username: String,
    pub action: String,
    pub resource_type: Option<String>,
    pub resource_id: Option<i64>,
    pub details: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Security-relevant event categories. The critical subset additionally
/// raises an operator alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityEventType {
    SuccessfulLogin,
    FailedLogin,
    Logout,
    UnauthorizedAccess,
    SuspiciousActivity,
    RateLimitExceeded,
}

impl SecurityEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityEventType::SuccessfulLogin => "SUCCESSFUL_LOGIN",
            SecurityEventType::FailedLogin => "FAILED_LOGIN",
            SecurityEventType::Logout => "LOGOUT",
            SecurityEventType::UnauthorizedAccess => "UNAUTHORIZED_ACCESS",
            SecurityEventType::SuspiciousActivity => "SUSPICIOUS_ACTIVITY",
            SecurityEventType::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
        }
    }

    /// Audit trail tag, e.g. `SECURITY_FAILED_LOGIN`.
    pub fn action_tag(&self) -> String {
        format!("SECURITY_{}", self.as_str())
    }

    /// Whether this event also raises a high-severity alert.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            SecurityEventType::FailedLogin
                | SecurityEventType::UnauthorizedAccess
                | SecurityEventType::SuspiciousActivity
                | SecurityEventType::RateLimitExceeded
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_tag() {
        assert_eq!(
            SecurityEventType::FailedLogin.action_tag(),
            "SECURITY_FAILED_LOGIN"
        );
        assert_eq!(SecurityEventType::Logout.action_tag(), "SECURITY_LOGOUT");
    }

    #[test]
    fn test_critical_set() {
        assert!(SecurityEventType::FailedLogin.is_critical());
        assert!(SecurityEventType::UnauthorizedAccess.is_critical());
        assert!(SecurityEventType::SuspiciousActivity.is_critical());
        assert!(SecurityEventType::RateLimitExceeded.is_critical());
        assert!(!SecurityEventType::SuccessfulLogin.is_critical());
        assert!(!SecurityEventType::Logout.is_critical());
    }
}
