//! Authentication endpoints: login, register, logout, current user.

use crate::{
    auth::middleware::CurrentUser,
    error::AppError,
    middleware::{get_client_ip, AppState},
    models::{
        auth::LoginRequest,
        user::{RegisterRequest, Role, UserResponse},
    },
};
use axum::{
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);

    let response = state
        .auth_service
        .login(req, client_ip.as_deref())
        .await?;

    Ok(Json(response))
}

/// Self-service registration. Always creates a standard user; privileged
/// roles are granted only through the admin user-management endpoints.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .auth_service
        .register_user(&req.username, &req.password, Role::StandardUser)
        .await?;

    Ok(Json(json!({
        "message": "Registration successful",
        "user": UserResponse::from(user)
    })))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    current: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);

    state
        .auth_service
        .logout(&current.token, client_ip.as_deref())
        .await?;

    Ok(Json(json!({ "message": "Logged out" })))
}

pub async fn get_current_user(current: CurrentUser) -> impl IntoResponse {
    Json(UserResponse::from(current.user))
}
