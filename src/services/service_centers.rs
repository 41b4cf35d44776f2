//! Service center management service

use validator::Validate;

use super::cascade::CascadeService;
use crate::{
    error::AppResult,
    models::service_center::{
        CreateServiceCenter, ServiceCenter, ServiceCenterDetails, UpdateServiceCenter,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ServiceCentersService {
    repository: Repository,
    cascade: CascadeService,
}

impl ServiceCentersService {
    pub fn new(repository: Repository, cascade: CascadeService) -> Self {
        Self { repository, cascade }
    }

    /// List service centers with manager, mechanics and requests
    pub async fn list(&self) -> AppResult<Vec<ServiceCenterDetails>> {
        let services = self.repository.service_centers.list().await?;
        let ids: Vec<i32> = services.iter().map(|s| s.id).collect();

        let managers = self.repository.managers.list().await?;
        let mechanics = self.repository.mechanics.list().await?;
        let requests = self.repository.requests.list_where("service_id", &ids).await?;

        Ok(services
            .into_iter()
            .map(|service| ServiceCenterDetails {
                manager: managers
                    .iter()
                    .find(|m| m.service_id == Some(service.id))
                    .cloned(),
                mechanics: mechanics
                    .iter()
                    .filter(|m| m.service_id == Some(service.id))
                    .cloned()
                    .collect(),
                requests: requests
                    .iter()
                    .filter(|r| r.service_id == Some(service.id))
                    .cloned()
                    .collect(),
                service,
            })
            .collect())
    }

    pub async fn get(&self, id: i32) -> AppResult<ServiceCenterDetails> {
        let service = self.repository.service_centers.get_by_id(id).await?;
        Ok(ServiceCenterDetails {
            manager: self.repository.managers.get_by_service(id).await?,
            mechanics: self.repository.mechanics.list_by_service(id).await?,
            requests: self.repository.requests.list_by_service(id).await?,
            service,
        })
    }

    pub async fn create(&self, data: CreateServiceCenter) -> AppResult<ServiceCenter> {
        data.validate()?;
        let service = self.repository.service_centers.create(&data).await?;
        tracing::info!(service_id = service.id, "Service created");
        Ok(service)
    }

    pub async fn update(&self, id: i32, data: UpdateServiceCenter) -> AppResult<ServiceCenter> {
        data.validate()?;
        self.repository.service_centers.update(id, &data).await
    }

    /// Delete a service center with its staff; see [`CascadeService`]
    pub async fn delete(&self, id: i32) -> AppResult<ServiceCenter> {
        self.cascade.delete_service_center(id).await
    }
}
