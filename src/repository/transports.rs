//! Transports repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::transport::{CreateTransport, Transport, UpdateTransport},
};

#[derive(Clone)]
pub struct TransportsRepository {
    pool: Pool<Postgres>,
}

impl TransportsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Transport>> {
        let rows = sqlx::query_as::<_, Transport>("SELECT * FROM transports ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Transport> {
        sqlx::query_as::<_, Transport>("SELECT * FROM transports WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Transport {} not found", id)))
    }

    pub async fn get_many(&self, ids: &[i32]) -> AppResult<Vec<Transport>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, Transport>("SELECT * FROM transports WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM transports WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn create(&self, data: &CreateTransport) -> AppResult<Transport> {
        let row = sqlx::query_as::<_, Transport>(
            r#"
            INSERT INTO transports (type, serial, model, photo)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&data.kind)
        .bind(&data.serial)
        .bind(&data.model)
        .bind(&data.photo)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, id: i32, data: &UpdateTransport) -> AppResult<Transport> {
        let mut sets: Vec<String> = Vec::new();
        let mut idx = 1;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.kind, "type");
        add_field!(data.serial, "serial");
        add_field!(data.model, "model");
        add_field!(data.photo, "photo");

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!(
            "UPDATE transports SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_as::<_, Transport>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.kind);
        bind_field!(data.serial);
        bind_field!(data.model);
        bind_field!(data.photo);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Transport {} not found", id)))
    }

    /// Delete transport. Fails with a conflict while requests still reference it.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM transports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Transport {} not found", id)));
        }
        Ok(())
    }
}
