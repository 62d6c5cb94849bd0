//! Backup and restore endpoints. Admin only.

use crate::{
    auth::middleware::CurrentUser,
    error::AppError,
    middleware::{get_client_ip, AppState},
    models::audit::NewAuditEvent,
};
use axum::{extract::State, http::HeaderMap, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct RestoreRequest {
    pub file_path: String,
}

pub async fn create_backup(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    current: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);

    state
        .permission_service
        .require_admin(&current.user, client_ip.as_deref())
        .await?;

    let backup = state
        .backup_service
        .create_backup(&current.user.username)
        .await?;

    state
        .security_service
        .log_action(&NewAuditEvent {
            username: current.user.username.clone(),
            action: "BACKUP_CREATED".to_string(),
            details: Some(format!("Backup written to '{}'", backup.file_path)),
            ip_address: client_ip,
            ..Default::default()
        })
        .await?;

    Ok(Json(json!({
        "message": "Backup created",
        "backup": backup
    })))
}

pub async fn list_backups(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    current: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);

    state
        .permission_service
        .require_admin(&current.user, client_ip.as_deref())
        .await?;

    let backups = state.backup_service.list_backups().await?;

    Ok(Json(json!({
        "count": backups.len(),
        "backups": backups
    })))
}

pub async fn restore_backup(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    current: CurrentUser,
    Json(req): Json<RestoreRequest>,
) -> Result<impl IntoResponse, AppError> {
    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);

    state
        .permission_service
        .require_admin(&current.user, client_ip.as_deref())
        .await?;

    state
        .backup_service
        .restore_backup(&req.file_path, &current.user.username)
        .await?;

    state
        .security_service
        .log_action(&NewAuditEvent {
            username: current.user.username.clone(),
            action: "BACKUP_RESTORED".to_string(),
            details: Some(format!("Database restored from '{}'", req.file_path)),
            ip_address: client_ip,
            ..Default::default()
        })
        .await?;

    Ok(Json(json!({ "message": "Database restored" })))
}
