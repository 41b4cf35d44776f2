//! Business logic services

pub mod accounts;
pub mod applicants;
pub mod cascade;
pub mod managers;
pub mod mechanics;
pub mod requests;
pub mod service_centers;
pub mod transports;

use std::sync::Arc;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub accounts: accounts::AccountsService,
    pub applicants: applicants::ApplicantsService,
    pub transports: transports::TransportsService,
    pub mechanics: mechanics::MechanicsService,
    pub managers: managers::ManagersService,
    pub service_centers: service_centers::ServiceCentersService,
    pub requests: requests::RequestsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository. `cascade_retries`
    /// bounds how often a service cascade is replayed after a serialization
    /// failure.
    pub fn new(repository: Repository, auth_config: AuthConfig, cascade_retries: u32) -> Self {
        let cascade = cascade::CascadeService::new(Arc::new(repository.clone()), cascade_retries);

        Self {
            accounts: accounts::AccountsService::new(repository.clone(), auth_config),
            applicants: applicants::ApplicantsService::new(repository.clone()),
            transports: transports::TransportsService::new(repository.clone()),
            mechanics: mechanics::MechanicsService::new(repository.clone(), cascade.clone()),
            managers: managers::ManagersService::new(repository.clone()),
            service_centers: service_centers::ServiceCentersService::new(repository.clone(), cascade),
            requests: requests::RequestsService::new(repository.clone()),
            repository,
        }
    }

    /// Check that the database answers
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        self.repository.ping().await
    }
}
