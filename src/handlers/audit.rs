//! Audit trail endpoints. Read-only; admin only.

use crate::{
    auth::middleware::CurrentUser,
    error::AppError,
    middleware::{get_client_ip, AppState},
    repository::AuditRepository,
};
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub limit: Option<i64>,
}

pub async fn list_audit_log(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    current: CurrentUser,
    Query(query): Query<AuditQuery>,
) -> Result<impl IntoResponse, AppError> {
    let client_ip = get_client_ip(&headers, state.config.security.trust_proxy);

    state
        .permission_service
        .require_admin(&current.user, client_ip.as_deref())
        .await?;

    let limit = query.limit.unwrap_or(100).clamp(1, 1000);
    let events = AuditRepository::new(state.db.clone())
        .list_recent(limit)
        .await?;

    Ok(Json(json!({
        "count": events.len(),
        "events": events
    })))
}
