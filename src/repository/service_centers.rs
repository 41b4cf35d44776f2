//! Service centers repository for database operations
//!
//! Deletion cascades to staff and requests and lives in [`super::cascade`].

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::service_center::{CreateServiceCenter, ServiceCenter, UpdateServiceCenter},
};

#[derive(Clone)]
pub struct ServiceCentersRepository {
    pool: Pool<Postgres>,
}

impl ServiceCentersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<ServiceCenter>> {
        let rows = sqlx::query_as::<_, ServiceCenter>("SELECT * FROM services ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<ServiceCenter> {
        sqlx::query_as::<_, ServiceCenter>("SELECT * FROM services WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Service {} not found", id)))
    }

    pub async fn get_many(&self, ids: &[i32]) -> AppResult<Vec<ServiceCenter>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, ServiceCenter>("SELECT * FROM services WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM services WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn create(&self, data: &CreateServiceCenter) -> AppResult<ServiceCenter> {
        let row = sqlx::query_as::<_, ServiceCenter>(
            "INSERT INTO services (address, work_time) VALUES ($1, $2) RETURNING *",
        )
        .bind(&data.address)
        .bind(&data.work_time)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, id: i32, data: &UpdateServiceCenter) -> AppResult<ServiceCenter> {
        sqlx::query_as::<_, ServiceCenter>(
            r#"
            UPDATE services SET
                address = COALESCE($1, address),
                work_time = COALESCE($2, work_time)
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(&data.address)
        .bind(&data.work_time)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Service {} not found", id)))
    }
}
