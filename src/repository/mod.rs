//! Repository layer for database operations

pub mod accounts;
pub mod applicants;
pub mod cascade;
pub mod managers;
pub mod mechanics;
pub mod requests;
pub mod service_centers;
pub mod transports;

#[cfg(test)]
pub mod memory;

use sqlx::{Pool, Postgres};

pub use cascade::{CascadeStore, CascadeTx};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub accounts: accounts::AccountsRepository,
    pub applicants: applicants::ApplicantsRepository,
    pub transports: transports::TransportsRepository,
    pub mechanics: mechanics::MechanicsRepository,
    pub managers: managers::ManagersRepository,
    pub service_centers: service_centers::ServiceCentersRepository,
    pub requests: requests::RequestsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            accounts: accounts::AccountsRepository::new(pool.clone()),
            applicants: applicants::ApplicantsRepository::new(pool.clone()),
            transports: transports::TransportsRepository::new(pool.clone()),
            mechanics: mechanics::MechanicsRepository::new(pool.clone()),
            managers: managers::ManagersRepository::new(pool.clone()),
            service_centers: service_centers::ServiceCentersRepository::new(pool.clone()),
            requests: requests::RequestsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the database, used by the readiness probe
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
