//! Account lookups shared by applicants, mechanics and managers

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::Account,
};

#[derive(Clone)]
pub struct AccountsRepository {
    pool: Pool<Postgres>,
}

impl AccountsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id<A: Account>(&self, id: i32) -> AppResult<A> {
        let query = format!("SELECT * FROM {} WHERE id = $1", A::TABLE);
        sqlx::query_as::<_, A>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", A::KIND, id)))
    }

    pub async fn get_by_email<A: Account>(&self, email: &str) -> AppResult<Option<A>> {
        let query = format!("SELECT * FROM {} WHERE lower(email) = lower($1)", A::TABLE);
        let row = sqlx::query_as::<_, A>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Replace (or clear) the photo of an account
    pub async fn update_photo<A: Account>(&self, id: i32, photo: Option<&str>) -> AppResult<A> {
        let query = format!("UPDATE {} SET photo = $1 WHERE id = $2 RETURNING *", A::TABLE);
        sqlx::query_as::<_, A>(&query)
            .bind(photo)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", A::KIND, id)))
    }
}
