//! Requests repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::request::{CreateRequest, Request, RequestChanges, RequestStatus},
};

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Postgres>,
}

impl RequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all requests, newest first
    pub async fn list(&self) -> AppResult<Vec<Request>> {
        let rows = sqlx::query_as::<_, Request>(
            "SELECT * FROM requests ORDER BY submitted_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get request by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Request> {
        sqlx::query_as::<_, Request>("SELECT * FROM requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))
    }

    /// Requests filed by an applicant
    pub async fn list_by_applicant(&self, applicant_id: i32) -> AppResult<Vec<Request>> {
        self.list_where("applicant_id", &[applicant_id]).await
    }

    /// Requests filed for a transport
    pub async fn list_by_transport(&self, transport_id: i32) -> AppResult<Vec<Request>> {
        self.list_where("transport_id", &[transport_id]).await
    }

    /// Requests assigned to a mechanic
    pub async fn list_by_mechanic(&self, mechanic_id: i32) -> AppResult<Vec<Request>> {
        self.list_where("mechanic_id", &[mechanic_id]).await
    }

    /// Requests handled by a service center
    pub async fn list_by_service(&self, service_id: i32) -> AppResult<Vec<Request>> {
        self.list_where("service_id", &[service_id]).await
    }

    /// Requests whose `column` is any of `ids`. Only called with the fixed
    /// column names above.
    pub async fn list_where(&self, column: &'static str, ids: &[i32]) -> AppResult<Vec<Request>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT * FROM requests WHERE {} = ANY($1) ORDER BY submitted_at DESC, id DESC",
            column
        );
        let rows = sqlx::query_as::<_, Request>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Create a request with its already resolved status and `closed_at`
    pub async fn create(
        &self,
        data: &CreateRequest,
        status: &RequestStatus,
        closed_at: Option<DateTime<Utc>>,
    ) -> AppResult<Request> {
        let row = sqlx::query_as::<_, Request>(
            r#"
            INSERT INTO requests (problem, status, transport_id, applicant_id, mechanic_id, service_id, closed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&data.problem)
        .bind(status)
        .bind(data.transport_id)
        .bind(data.applicant_id)
        .bind(data.mechanic_id)
        .bind(data.service_id)
        .bind(closed_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Apply resolved changes to one request. Only the columns present in
    /// `changes` are written; the single UPDATE is atomic.
    pub async fn update(&self, id: i32, changes: &RequestChanges) -> AppResult<Request> {
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

        add_field!(changes.problem, "problem");
        add_field!(changes.status, "status");
        add_field!(changes.mechanic_id, "mechanic_id");
        add_field!(changes.service_id, "service_id");
        add_field!(changes.closed_at, "closed_at");

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!(
            "UPDATE requests SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_as::<_, Request>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(changes.problem);
        bind_field!(changes.status);
        bind_field!(changes.mechanic_id);
        bind_field!(changes.service_id);
        bind_field!(changes.closed_at);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))
    }

    /// Delete a request
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Request {} not found", id)));
        }
        Ok(())
    }
}
