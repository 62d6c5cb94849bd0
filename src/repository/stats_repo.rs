//! Dashboard aggregation queries

use crate::error::AppError;
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashMap;

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_resources: i64,
    pub resources_by_status: HashMap<String, i64>,
    pub users_by_role: HashMap<String, i64>,
    pub unresolved_alerts: i64,
}

pub struct StatsRepository {
    db: SqlitePool,
}

impl StatsRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, AppError> {
        let resources_by_status: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM resources GROUP BY status")
                .fetch_all(&self.db)
                .await?;

        let users_by_role: Vec<(String, i64)> =
            sqlx::query_as("SELECT role, COUNT(*) FROM users WHERE is_active = 1 GROUP BY role")
                .fetch_all(&self.db)
                .await?;

        let unresolved_alerts: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM alerts WHERE is_resolved = 0")
                .fetch_one(&self.db)
                .await?;

        let total_resources: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resources")
            .fetch_one(&self.db)
            .await?;

        Ok(DashboardStats {
            total_resources,
            resources_by_status: resources_by_status.into_iter().collect(),
            users_by_role: users_by_role.into_iter().collect(),
            unresolved_alerts,
        })
    }
}
