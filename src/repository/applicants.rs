//! Applicants repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::applicant::{Applicant, CreateApplicant, UpdateApplicant},
};

#[derive(Clone)]
pub struct ApplicantsRepository {
    pool: Pool<Postgres>,
}

impl ApplicantsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Applicant>> {
        let rows = sqlx::query_as::<_, Applicant>("SELECT * FROM applicants ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get applicant by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Applicant> {
        sqlx::query_as::<_, Applicant>("SELECT * FROM applicants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Applicant {} not found", id)))
    }

    /// Fetch several applicants at once
    pub async fn get_many(&self, ids: &[i32]) -> AppResult<Vec<Applicant>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, Applicant>("SELECT * FROM applicants WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM applicants WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Create applicant with an already hashed password
    pub async fn create(&self, data: &CreateApplicant, password_hash: &str) -> AppResult<Applicant> {
        let row = sqlx::query_as::<_, Applicant>(
            r#"
            INSERT INTO applicants (name, email, password, photo, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(password_hash)
        .bind(&data.photo)
        .bind(&data.role)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update applicant; `password_hash` replaces the stored hash when given
    pub async fn update(
        &self,
        id: i32,
        data: &UpdateApplicant,
        password_hash: Option<String>,
    ) -> AppResult<Applicant> {
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
        add_field!(data.role, "role");

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!(
            "UPDATE applicants SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_as::<_, Applicant>(&query);

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
        bind_field!(data.role);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Applicant {} not found", id)))
    }

    /// Delete applicant. Fails with a conflict while requests still reference it.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM applicants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Applicant {} not found", id)));
        }
        Ok(())
    }
}
