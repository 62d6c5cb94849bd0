//! Security event logging: durable audit trail plus alert escalation.

use crate::{
    error::AppError,
    models::{
        alert::AlertLevel,
        audit::{NewAuditEvent, SecurityEventType},
    },
    repository::{alert_repo::AlertRepository, audit_repo::AuditRepository},
};
use sqlx::SqlitePool;

pub struct SecurityService {
    db: SqlitePool,
}

impl SecurityService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Record a security event. Always writes an audit row; for the critical
    /// event types it also raises a high-severity alert. Both writes commit
    /// in one transaction so a reader can never observe the alert without
    /// its audit trail.
    pub async fn log_event(
        &self,
        username: &str,
        event_type: SecurityEventType,
        details: &str,
        ip_address: Option<&str>,
    ) -> Result<(), AppError> {
        let event = NewAuditEvent {
            username: username.to_string(),
            action: event_type.action_tag(),
            details: Some(details.to_string()),
            ip_address: ip_address.map(|s| s.to_string()),
            ..Default::default()
        };

        let mut tx = self.db.begin().await?;

        AuditRepository::insert_with(&mut *tx, &event).await?;

        if event_type.is_critical() {
            AlertRepository::insert_with(
                &mut *tx,
                event_type.as_str(),
                &format!("Security event: {}", details),
                AlertLevel::High,
            )
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            username = %username,
            event_type = event_type.as_str(),
            "Security event recorded"
        );

        Ok(())
    }

    /// Plain audit write for non-security actions (CRUD, backups).
    pub async fn log_action(&self, event: &NewAuditEvent) -> Result<(), AppError> {
        AuditRepository::new(self.db.clone()).insert(event).await
    }

    /// Raise a standalone operator alert (business-logic collaborators use
    /// this for non-security notifications).
    pub async fn raise_alert(
        &self,
        alert_type: &str,
        message: &str,
        level: AlertLevel,
    ) -> Result<i64, AppError> {
        AlertRepository::new(self.db.clone())
            .insert(alert_type, message, level)
            .await
    }
}
