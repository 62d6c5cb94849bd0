//! Route registration and service wiring.

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;

use crate::{
    auth::{middleware::auth_middleware, RateLimiter, TokenService},
    config::AppConfig,
    error::AppError,
    handlers,
    middleware::{request_tracking_middleware, AppState},
    services::{AuthService, BackupService, PermissionService, SecurityService},
};

/// Build the shared state: token service, rate limiter and the service
/// layer, all hanging off one pool.
pub fn build_state(config: Arc<AppConfig>, db: sqlx::SqlitePool) -> Result<Arc<AppState>, AppError> {
    let token_service = Arc::new(TokenService::from_config(&config)?);

    let rate_limiter = Arc::new(RateLimiter::new(
        config.security.login_max_attempts,
        Duration::from_secs(config.security.login_window_secs),
    ));

    let security_service = Arc::new(SecurityService::new(db.clone()));

    let auth_service = Arc::new(AuthService::new(
        db.clone(),
        token_service,
        security_service.clone(),
        rate_limiter,
        config.clone(),
    ));

    let permission_service = Arc::new(PermissionService::new(security_service.clone()));

    let backup_service = Arc::new(BackupService::new(db.clone(), &config.database));

    Ok(Arc::new(AppState {
        config,
        db,
        auth_service,
        permission_service,
        security_service,
        backup_service,
    }))
}

/// Create the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Public endpoints: probes and the two unauthenticated auth operations.
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .route("/api/v1/auth/register", post(handlers::auth::register));

    let authenticated_routes = Router::new()
        .route("/api/v1/auth/me", get(handlers::auth::get_current_user))
        .route("/api/v1/auth/logout", post(handlers::auth::logout))
        // User management
        .route(
            "/api/v1/users",
            get(handlers::user::list_users).post(handlers::user::create_user),
        )
        .route("/api/v1/users/role", put(handlers::user::change_role))
        .route("/api/v1/users/password", put(handlers::user::set_password))
        .route(
            "/api/v1/users/{username}",
            axum::routing::delete(handlers::user::deactivate_user),
        )
        // Resources
        .route(
            "/api/v1/resources",
            get(handlers::resource::list_resources).post(handlers::resource::create_resource),
        )
        .route(
            "/api/v1/resources/{id}",
            get(handlers::resource::get_resource)
                .put(handlers::resource::update_resource)
                .delete(handlers::resource::delete_resource),
        )
        // Dashboard and alerts
        .route("/api/v1/dashboard", get(handlers::dashboard::get_dashboard))
        .route("/api/v1/alerts", get(handlers::alert::list_alerts))
        .route(
            "/api/v1/alerts/{id}/resolve",
            post(handlers::alert::resolve_alert),
        )
        // Audit trail
        .route("/api/v1/audit", get(handlers::audit::list_audit_log))
        // Backups
        .route(
            "/api/v1/backups",
            get(handlers::backup::list_backups).post(handlers::backup::create_backup),
        )
        .route(
            "/api/v1/backups/restore",
            post(handlers::backup::restore_backup),
        )
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        // 1 MiB request cap; every payload this API accepts is tiny.
        .layer(tower_http::limit::RequestBodyLimitLayer::new(1024 * 1024))
        .layer(from_fn(request_tracking_middleware))
        .with_state(state)
}
