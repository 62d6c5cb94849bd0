//! Authentication façade: login, token resolution, logout, registration.

use crate::{
    auth::{
        password::PasswordHasher,
        rate_limit::RateLimiter,
        token::{self, TokenService},
    },
    config::AppConfig,
    error::AppError,
    models::{
        audit::SecurityEventType,
        auth::{LoginRequest, LoginResponse},
        user::{Role, User},
    },
    repository::{SessionRepository, UserRepository},
    services::SecurityService,
};
use std::sync::Arc;

pub struct AuthService {
    db: sqlx::SqlitePool,
    token_service: Arc<TokenService>,
    security: Arc<SecurityService>,
    rate_limiter: Arc<RateLimiter>,
    hasher: PasswordHasher,
    config: Arc<AppConfig>,
}

impl AuthService {
    pub fn new(
        db: sqlx::SqlitePool,
        token_service: Arc<TokenService>,
        security: Arc<SecurityService>,
        rate_limiter: Arc<RateLimiter>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            db,
            token_service,
            security,
            rate_limiter,
            hasher: PasswordHasher::new(),
            config,
        }
    }

    /// Authenticate a user and issue a token.
    ///
    /// Unknown user, inactive user and wrong password all produce the same
    /// `AuthenticationFailed` outcome and an identical failure event, so the
    /// response cannot be used to enumerate accounts.
    pub async fn login(
        &self,
        req: LoginRequest,
        client_ip: Option<&str>,
    ) -> Result<LoginResponse, AppError> {
        // Rate limit first: an over-limit attempt must not reach the
        // credential store at all.
        if !self.rate_limiter.try_acquire(&req.username) {
            tracing::warn!(username = %req.username, "Login rate limit exceeded");
            if let Err(e) = self
                .security
                .log_event(
                    &req.username,
                    SecurityEventType::RateLimitExceeded,
                    &format!(
                        "Login attempts for '{}' exceeded {} in {}s",
                        req.username,
                        self.config.security.login_max_attempts,
                        self.config.security.login_window_secs
                    ),
                    client_ip,
                )
                .await
            {
                tracing::warn!(error = %e, "Failed to record rate limit event");
            }
            return Err(AppError::RateLimitExceeded);
        }

        let user_repo = UserRepository::new(self.db.clone());

        let user = match user_repo.find_by_username(&req.username).await? {
            Some(user) if self.hasher.verify(&req.password, &user.password_hash) => user,
            // Unknown, inactive or wrong password: log with the attempted
            // username, fail uniformly.
            _ => {
                if let Err(e) = self
                    .security
                    .log_event(
                        &req.username,
                        SecurityEventType::FailedLogin,
                        &format!("Failed login attempt for user '{}'", req.username),
                        client_ip,
                    )
                    .await
                {
                    tracing::warn!(error = %e, "Failed to record failed login event");
                }
                return Err(AppError::AuthenticationFailed);
            }
        };

        user_repo.update_last_login(&user.username).await?;

        let ttl = self.token_service.default_ttl();
        let (access_token, expires_at) = self.token_service.issue(&user.username, user.role, ttl)?;

        SessionRepository::new(self.db.clone())
            .register(&user.username, &token::fingerprint(&access_token), expires_at)
            .await?;

        // A logging failure must not block a successful authentication.
        if let Err(e) = self
            .security
            .log_event(
                &user.username,
                SecurityEventType::SuccessfulLogin,
                &format!("Successful login for user '{}'", user.username),
                client_ip,
            )
            .await
        {
            tracing::warn!(error = %e, "Failed to record successful login event");
        }

        Ok(LoginResponse {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: ttl.num_seconds() as u64,
            user: user.into(),
        })
    }

    /// Resolve the identity behind a bearer token.
    ///
    /// Validity is a conjunction: the signature must verify AND an unexpired
    /// session fingerprint must exist AND the subject must still be an
    /// active user. Each failure is the same uniform `Unauthorized`.
    pub async fn resolve(&self, token: &str) -> Result<User, AppError> {
        let claims = self.token_service.verify(token)?;

        let sessions = SessionRepository::new(self.db.clone());
        if !sessions.is_valid(&token::fingerprint(token)).await? {
            tracing::debug!(username = %claims.sub, "Token has no live session");
            return Err(AppError::Unauthorized);
        }

        UserRepository::new(self.db.clone())
            .find_by_username(&claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Revoke the session behind a token. Idempotent; returns whether a
    /// live session existed.
    pub async fn logout(&self, token: &str, client_ip: Option<&str>) -> Result<bool, AppError> {
        let revoked = SessionRepository::new(self.db.clone())
            .revoke(&token::fingerprint(token))
            .await?;

        if revoked {
            // Best-effort username for the audit trail; the token may
            // already be unverifiable.
            let username = self
                .token_service
                .verify(token)
                .map(|c| c.sub)
                .unwrap_or_else(|_| "anonymous".to_string());

            if let Err(e) = self
                .security
                .log_event(
                    &username,
                    SecurityEventType::Logout,
                    &format!("User '{}' logged out", username),
                    client_ip,
                )
                .await
            {
                tracing::warn!(error = %e, "Failed to record logout event");
            }
        }

        Ok(revoked)
    }

    /// Create a user account. The password is always hashed before it is
    /// written; a duplicate username surfaces as `Conflict` from the store's
    /// unique constraint.
    pub async fn register_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<User, AppError> {
        PasswordHasher::validate_password_policy(password, &self.config.security)?;

        let password_hash = self.hasher.hash(password)?;

        UserRepository::new(self.db.clone())
            .create(username, &password_hash, role)
            .await
    }

    /// Administrative password reset. Always goes through the hasher.
    pub async fn set_password(&self, username: &str, new_password: &str) -> Result<bool, AppError> {
        PasswordHasher::validate_password_policy(new_password, &self.config.security)?;

        let password_hash = self.hasher.hash(new_password)?;

        UserRepository::new(self.db.clone())
            .update_password(username, &password_hash)
            .await
    }
}
