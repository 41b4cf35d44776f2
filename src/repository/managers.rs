//! Managers repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::manager::{CreateManager, Manager, UpdateManager},
};

#[derive(Clone)]
pub struct ManagersRepository {
    pool: Pool<Postgres>,
}

impl ManagersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Manager>> {
        let rows = sqlx::query_as::<_, Manager>("SELECT * FROM managers ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Manager> {
        sqlx::query_as::<_, Manager>("SELECT * FROM managers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Manager {} not found", id)))
    }

    /// The manager running a service center, if any
    pub async fn get_by_service(&self, service_id: i32) -> AppResult<Option<Manager>> {
        let row = sqlx::query_as::<_, Manager>("SELECT * FROM managers WHERE service_id = $1")
            .bind(service_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn create(&self, data: &CreateManager, password_hash: &str) -> AppResult<Manager> {
        let row = sqlx::query_as::<_, Manager>(
            r#"
            INSERT INTO managers (name, email, password, photo, service_id)
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
        data: &UpdateManager,
        password_hash: Option<String>,
    ) -> AppResult<Manager> {
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
            "UPDATE managers SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_as::<_, Manager>(&query);

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
            .ok_or_else(|| AppError::NotFound(format!("Manager {} not found", id)))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM managers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Manager {} not found", id)));
        }
        Ok(())
    }
}
