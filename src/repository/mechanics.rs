//! Mechanics repository for database operations
//!
//! Deletion is not here: removing a mechanic has to unassign its requests
//! first, see [`super::cascade`].

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::mechanic::{CreateMechanic, Mechanic, UpdateMechanic},
};

#[derive(Clone)]
pub struct MechanicsRepository {
    pool: Pool<Postgres>,
}

impl MechanicsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Mechanic>> {
        let rows = sqlx::query_as::<_, Mechanic>("SELECT * FROM mechanics ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Mechanic> {
        sqlx::query_as::<_, Mechanic>("SELECT * FROM mechanics WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Mechanic {} not found", id)))
    }

    pub async fn get_many(&self, ids: &[i32]) -> AppResult<Vec<Mechanic>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, Mechanic>("SELECT * FROM mechanics WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Mechanics working at a service center
    pub async fn list_by_service(&self, service_id: i32) -> AppResult<Vec<Mechanic>> {
        let rows = sqlx::query_as::<_, Mechanic>(
            "SELECT * FROM mechanics WHERE service_id = $1 ORDER BY id",
        )
        .bind(service_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM mechanics WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn create(&self, data: &CreateMechanic, password_hash: &str) -> AppResult<Mechanic> {
        let row = sqlx::query_as::<_, Mechanic>(
            r#"
            INSERT INTO mechanics (name, email, password, photo, service_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(password_hash)
        .bind(&data.photo)
        .bind(data.service_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(
        &self,
        id: i32,
        data: &UpdateMechanic,
        password_hash: Option<String>,
    ) -> AppResult<Mechanic> {
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

        add_field!(data.name, "name");
        add_field!(data.email, "email");
        add_field!(password_hash, "password");
        add_field!(data.photo, "photo");
        add_field!(data.service_id, "service_id");

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!(
            "UPDATE mechanics SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_as::<_, Mechanic>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.email);
        bind_field!(password_hash);
        bind_field!(data.photo);
        bind_field!(data.service_id);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Mechanic {} not found", id)))
    }
}
