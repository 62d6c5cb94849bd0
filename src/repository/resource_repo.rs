//! Resource repository

use crate::{error::AppError, models::resource::Resource};
use chrono::Utc;
use sqlx::SqlitePool;

pub struct ResourceRepository {
    db: SqlitePool,
}

impl ResourceRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        name: &str,
        resource_type: Option<&str>,
        description: Option<&str>,
        status: &str,
        created_by: &str,
    ) -> Result<Resource, AppError> {
        let now = Utc::now();
        let resource = sqlx::query_as::<_, Resource>(
            r#"
            INSERT INTO resources (name, type, description, status, created_at, updated_at, created_by)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(resource_type)
        .bind(description)
        .bind(status)
        .bind(now)
        .bind(now)
        .bind(created_by)
        .fetch_one(&self.db)
        .await?;

        Ok(resource)
    }

    pub async fn list(&self) -> Result<Vec<Resource>, AppError> {
        let resources = sqlx::query_as::<_, Resource>(
            "SELECT * FROM resources ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(resources)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Resource>, AppError> {
        let resource = sqlx::query_as::<_, Resource>("SELECT * FROM resources WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(resource)
    }

    pub async fn update(
        &self,
        id: i64,
        name: &str,
        resource_type: Option<&str>,
        description: Option<&str>,
        status: &str,
    ) -> Result<Option<Resource>, AppError> {
        let resource = sqlx::query_as::<_, Resource>(
            r#"
            UPDATE resources
            SET name = ?, type = ?, description = ?, status = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(resource_type)
        .bind(description)
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(resource)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM resources WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
