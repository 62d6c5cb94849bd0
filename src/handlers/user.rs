//! User management endpoints.

use crate::{
    auth::middleware::CurrentUser,
    error::AppError,
    middleware::{get_client_ip, AppState},
    models::{
        audit::NewAuditEvent,
        user::{ChangeRoleRequest, CreateUserRequest, Role, SetPasswordRequest, UserResponse},
    },
    repository::UserRepository,
};
use axum::{extract::State, http::HeaderMap, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

/// Admins and managers see every active account; everyone else sees only
/// their own.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let users: Vec<UserResponse> = match current.user.role {
        Role::Admin | Role::Manager => UserRepository::new(state.db.clone())
            .list_active()
            .await?
            .into_iter()
            .map(UserResponse::from)
            .collect(),
        _ => vec![UserResponse::from(current.user)],
    };

    Ok(Json(json!({
        "count": users.len(),
        "users": users
    })))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    current: CurrentUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);

    state
        .permission_service
        .require_admin(&current.user, client_ip.as_deref())
        .await?;

    let user = state
        .auth_service
        .register_user(&req.username, &req.password, req.role)
        .await?;

    state
        .security_service
        .log_action(&NewAuditEvent {
            username: current.user.username.clone(),
            action: "USER_CREATED".to_string(),
            details: Some(format!(
                "Created user '{}' with role '{}'",
                user.username, user.role
            )),
            ip_address: client_ip,
            ..Default::default()
        })
        .await?;

    Ok(Json(json!({
        "message": "User created",
        "user": UserResponse::from(user)
    })))
}

pub async fn change_role(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    current: CurrentUser,
    Json(req): Json<ChangeRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);

    state
        .permission_service
        .require_admin(&current.user, client_ip.as_deref())
        .await?;

    let changed = UserRepository::new(state.db.clone())
        .update_role(&req.username, req.role)
        .await?;
    if !changed {
        return Err(AppError::NotFound);
    }

    state
        .security_service
        .log_action(&NewAuditEvent {
            username: current.user.username.clone(),
            action: "ROLE_CHANGED".to_string(),
            details: Some(format!(
                "Changed role of '{}' to '{}'",
                req.username, req.role
            )),
            ip_address: client_ip,
            ..Default::default()
        })
        .await?;

    Ok(Json(json!({ "message": "Role updated" })))
}

/// Administrative password reset. The new password goes through the normal
/// policy check and hasher; plaintext is never written anywhere.
pub async fn set_password(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    current: CurrentUser,
    Json(req): Json<SetPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);

    state
        .permission_service
        .require_admin(&current.user, client_ip.as_deref())
        .await?;

    let changed = state
        .auth_service
        .set_password(&req.username, &req.new_password)
        .await?;
    if !changed {
        return Err(AppError::NotFound);
    }

    state
        .security_service
        .log_action(&NewAuditEvent {
            username: current.user.username.clone(),
            action: "PASSWORD_RESET".to_string(),
            details: Some(format!("Reset password for '{}'", req.username)),
            ip_address: client_ip,
            ..Default::default()
        })
        .await?;

    Ok(Json(json!({ "message": "Password updated" })))
}

/// Soft delete: the account is deactivated, its audit history stays.
pub async fn deactivate_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    current: CurrentUser,
    axum::extract::Path(username): axum::extract::Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);

    state
        .permission_service
        .require_admin(&current.user, client_ip.as_deref())
        .await?;

    if username == current.user.username {
        return Err(AppError::BadRequest(
            "Cannot deactivate your own account".to_string(),
        ));
    }

    let changed = UserRepository::new(state.db.clone())
        .deactivate(&username)
        .await?;
    if !changed {
        return Err(AppError::NotFound);
    }

    state
        .security_service
        .log_action(&NewAuditEvent {
            username: current.user.username.clone(),
            action: "USER_DEACTIVATED".to_string(),
            details: Some(format!("Deactivated user '{}'", username)),
            ip_address: client_ip,
            ..Default::default()
        })
        .await?;

    Ok(Json(json!({ "message": "User deactivated" })))
}
