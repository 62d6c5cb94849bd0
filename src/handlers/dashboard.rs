//! Dashboard endpoint: aggregate statistics for any authenticated user.

use crate::{auth::middleware::CurrentUser, error::AppError, middleware::AppState, repository::StatsRepository};
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(
        username = %current.user.username,
        role = %current.user.role,
        "Dashboard accessed"
    );

    let stats = StatsRepository::new(state.db.clone())
        .dashboard_stats()
        .await?;

    Ok(Json(json!({
        "user": current.user.username,
        "role": current.user.role,
        "stats": stats
    })))
}
