//! Resource management endpoints.
//!
//! Reads are open to any authenticated user; mutations require admin or
//! manager and raise a medium-severity alert so operators can follow
//! inventory changes from the dashboard.

use crate::{
    auth::middleware::CurrentUser,
    error::AppError,
    middleware::{get_client_ip, AppState},
    models::{alert::AlertLevel, audit::NewAuditEvent, resource::ResourceRequest, user::Role},
    repository::ResourceRepository,
};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

const WRITE_ROLES: &[Role] = &[Role::Admin, Role::Manager];

pub async fn list_resources(
    State(state): State<Arc<AppState>>,
    _current: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let resources = ResourceRepository::new(state.db.clone()).list().await?;

    Ok(Json(json!({
        "count": resources.len(),
        "resources": resources
    })))
}

pub async fn get_resource(
    State(state): State<Arc<AppState>>,
    _current: CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let resource = ResourceRepository::new(state.db.clone())
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(resource))
}

pub async fn create_resource(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    current: CurrentUser,
    Json(req): Json<ResourceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);

    state
        .permission_service
        .require_role(&current.user, WRITE_ROLES, client_ip.as_deref())
        .await?;

    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let resource = ResourceRepository::new(state.db.clone())
        .create(
            &req.name,
            req.resource_type.as_deref(),
            req.description.as_deref(),
            &req.status,
            &current.user.username,
        )
        .await?;

    record_resource_change(
        &state,
        &current,
        "RESOURCE_CREATED",
        &format!(
            "Resource '{}' created by '{}'",
            resource.name, current.user.username
        ),
        AlertLevel::Medium,
        client_ip,
    )
    .await;

    Ok(Json(json!({
        "message": "Resource created",
        "resource": resource
    })))
}

pub async fn update_resource(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<ResourceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);

    state
        .permission_service
        .require_role(&current.user, WRITE_ROLES, client_ip.as_deref())
        .await?;

    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let resource = ResourceRepository::new(state.db.clone())
        .update(
            id,
            &req.name,
            req.resource_type.as_deref(),
            req.description.as_deref(),
            &req.status,
        )
        .await?
        .ok_or(AppError::NotFound)?;

    record_resource_change(
        &state,
        &current,
        "RESOURCE_UPDATED",
        &format!(
            "Resource '{}' updated by '{}'",
            resource.name, current.user.username
        ),
        AlertLevel::Medium,
        client_ip,
    )
    .await;

    Ok(Json(json!({
        "message": "Resource updated",
        "resource": resource
    })))
}

pub async fn delete_resource(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);

    state
        .permission_service
        .require_role(&current.user, WRITE_ROLES, client_ip.as_deref())
        .await?;

    let deleted = ResourceRepository::new(state.db.clone()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }

    record_resource_change(
        &state,
        &current,
        "RESOURCE_DELETED",
        &format!("Resource {} deleted by '{}'", id, current.user.username),
        AlertLevel::High,
        client_ip,
    )
    .await;

    Ok(Json(json!({ "message": "Resource deleted" })))
}

/// Audit the change and raise the operator alert. Neither failure should
/// undo a mutation that already committed.
async fn record_resource_change(
    state: &AppState,
    current: &CurrentUser,
    action: &str,
    details: &str,
    level: AlertLevel,
    client_ip: Option<String>,
) {
    if let Err(e) = state
        .security_service
        .log_action(&NewAuditEvent {
            username: current.user.username.clone(),
            action: action.to_string(),
            details: Some(details.to_string()),
            ip_address: client_ip,
            ..Default::default()
        })
        .await
    {
        tracing::warn!(error = %e, action = action, "Failed to audit resource change");
    }

    if let Err(e) = state
        .security_service
        .raise_alert(action, details, level)
        .await
    {
        tracing::warn!(error = %e, action = action, "Failed to raise resource alert");
    }
}
