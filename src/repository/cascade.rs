//! Reference-repairing deletes
//!
//! [`CascadeStore`] is the slice of the store the cascade needs. The
//! orchestration in `services::cascade` only talks to these traits, so it runs
//! unchanged against PostgreSQL and against the in-memory store used in tests.

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::{Mechanic, ServiceCenter},
};

/// Store operations used by the cascade
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CascadeStore: Send + Sync {
    /// Open a serializable transaction for a service center cascade
    async fn begin_cascade(&self) -> AppResult<Box<dyn CascadeTx>>;

    /// Set `mechanic_id` to NULL on every request assigned to the mechanic
    async fn unassign_mechanic(&self, mechanic_id: i32) -> AppResult<u64>;

    /// Delete the mechanic row, NotFound when absent
    async fn delete_mechanic(&self, mechanic_id: i32) -> AppResult<Mechanic>;
}

/// One service center cascade in flight. Dropping it without [`commit`]
/// rolls every step back.
///
/// [`commit`]: CascadeTx::commit
#[async_trait]
pub trait CascadeTx: Send {
    /// Unassign requests whose mechanic works at the service center
    async fn unassign_service_mechanics(&mut self, service_id: i32) -> AppResult<u64>;

    /// Clear `service_id` on requests handled by the service center
    async fn detach_requests(&mut self, service_id: i32) -> AppResult<u64>;

    /// Ids of the mechanics working at the service center
    async fn mechanic_ids(&mut self, service_id: i32) -> AppResult<Vec<i32>>;

    /// Unassign requests from any of the given mechanics
    async fn unassign_mechanics(&mut self, mechanic_ids: &[i32]) -> AppResult<u64>;

    async fn delete_mechanics(&mut self, service_id: i32) -> AppResult<u64>;

    async fn delete_manager(&mut self, service_id: i32) -> AppResult<u64>;

    /// Delete the service center row and return it, NotFound when absent
    async fn delete_service(&mut self, service_id: i32) -> AppResult<ServiceCenter>;

    async fn commit(self: Box<Self>) -> AppResult<()>;
}

/// Service center cascade running inside a PostgreSQL transaction
pub struct PgCascadeTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl CascadeTx for PgCascadeTx {
    async fn unassign_service_mechanics(&mut self, service_id: i32) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE requests SET mechanic_id = NULL
            WHERE mechanic_id IN (SELECT id FROM mechanics WHERE service_id = $1)
            "#,
        )
        .bind(service_id)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected())
    }

    async fn detach_requests(&mut self, service_id: i32) -> AppResult<u64> {
        let result = sqlx::query("UPDATE requests SET service_id = NULL WHERE service_id = $1")
            .bind(service_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn mechanic_ids(&mut self, service_id: i32) -> AppResult<Vec<i32>> {
        let ids: Vec<i32> =
            sqlx::query_scalar("SELECT id FROM mechanics WHERE service_id = $1 ORDER BY id")
                .bind(service_id)
                .fetch_all(&mut *self.tx)
                .await?;
        Ok(ids)
    }

    async fn unassign_mechanics(&mut self, mechanic_ids: &[i32]) -> AppResult<u64> {
        if mechanic_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("UPDATE requests SET mechanic_id = NULL WHERE mechanic_id = ANY($1)")
            .bind(mechanic_ids)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_mechanics(&mut self, service_id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM mechanics WHERE service_id = $1")
            .bind(service_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_manager(&mut self, service_id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM managers WHERE service_id = $1")
            .bind(service_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_service(&mut self, service_id: i32) -> AppResult<ServiceCenter> {
        sqlx::query_as::<_, ServiceCenter>("DELETE FROM services WHERE id = $1 RETURNING *")
            .bind(service_id)
            .fetch_optional(&mut *self.tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Service {} not found", service_id)))
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl CascadeStore for Repository {
    async fn begin_cascade(&self) -> AppResult<Box<dyn CascadeTx>> {
        let mut tx = self.pool.begin().await?;
        // Step ordering is only safe at serializable isolation
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;
        Ok(Box::new(PgCascadeTx { tx }))
    }

    async fn unassign_mechanic(&self, mechanic_id: i32) -> AppResult<u64> {
        let result = sqlx::query("UPDATE requests SET mechanic_id = NULL WHERE mechanic_id = $1")
            .bind(mechanic_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_mechanic(&self, mechanic_id: i32) -> AppResult<Mechanic> {
        sqlx::query_as::<_, Mechanic>("DELETE FROM mechanics WHERE id = $1 RETURNING *")
            .bind(mechanic_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Mechanic {} not found", mechanic_id)))
    }
}
