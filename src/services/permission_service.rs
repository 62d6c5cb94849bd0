//! Role-based authorization gate.

use crate::{
    error::AppError,
    models::{audit::SecurityEventType, user::{Role, User}},
    services::SecurityService,
};
use std::sync::Arc;

pub struct PermissionService {
    security: Arc<SecurityService>,
}

impl PermissionService {
    pub fn new(security: Arc<SecurityService>) -> Self {
        Self { security }
    }

    /// Require that `user` holds one of `allowed` roles.
    ///
    /// A denial is never silent: exactly one unauthorized-access event is
    /// recorded (audit row plus high-severity alert) before the `Forbidden`
    /// error is returned. A logging failure downgrades to a warning rather
    /// than masking the denial.
    pub async fn require_role(
        &self,
        user: &User,
        allowed: &[Role],
        client_ip: Option<&str>,
    ) -> Result<(), AppError> {
        if allowed.contains(&user.role) {
            return Ok(());
        }

        tracing::warn!(
            username = %user.username,
            role = %user.role,
            required = ?allowed,
            "Authorization denied"
        );

        if let Err(e) = self
            .security
            .log_event(
                &user.username,
                SecurityEventType::UnauthorizedAccess,
                &format!(
                    "User '{}' with role '{}' attempted an action requiring one of {:?}",
                    user.username,
                    user.role,
                    allowed.iter().map(Role::as_str).collect::<Vec<_>>()
                ),
                client_ip,
            )
            .await
        {
            tracing::warn!(error = %e, "Failed to record unauthorized access event");
        }

        Err(AppError::Forbidden)
    }

    /// Convenience check for admin-only operations.
    pub async fn require_admin(
        &self,
        user: &User,
        client_ip: Option<&str>,
    ) -> Result<(), AppError> {
        self.require_role(user, &[Role::Admin], client_ip).await
    }
}
