//! Operator alert endpoints.

use crate::{
    auth::middleware::CurrentUser,
    error::AppError,
    middleware::{get_client_ip, AppState},
    models::user::Role,
    repository::AlertRepository,
};
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

const VIEW_ROLES: &[Role] = &[Role::Admin, Role::Manager];

#[derive(Debug, Deserialize)]
pub struct AlertQuery {
    #[serde(default)]
    pub include_resolved: bool,
}

pub async fn list_alerts(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    current: CurrentUser,
    Query(query): Query<AlertQuery>,
) -> Result<impl IntoResponse, AppError> {
    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);

    state
        .permission_service
        .require_role(&current.user, VIEW_ROLES, client_ip.as_deref())
        .await?;

    let alerts = AlertRepository::new(state.db.clone())
        .list(query.include_resolved)
        .await?;

    Ok(Json(json!({
        "count": alerts.len(),
        "alerts": alerts
    })))
}

/// Resolution is one-way; resolving an already-resolved alert is a 404.
pub async fn resolve_alert(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);

    state
        .permission_service
        .require_role(&current.user, VIEW_ROLES, client_ip.as_deref())
        .await?;

    let resolved = AlertRepository::new(state.db.clone())
        .resolve(id, &current.user.username)
        .await?;
    if !resolved {
        return Err(AppError::NotFound);
    }

    Ok(Json(json!({ "message": "Alert resolved" })))
}
