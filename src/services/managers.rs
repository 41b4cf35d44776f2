//! Manager management service

use validator::Validate;

use super::accounts::hash_password;
use crate::{
    error::{AppError, AppResult},
    models::manager::{CreateManager, Manager, ManagerDetails, UpdateManager},
    repository::Repository,
};

#[derive(Clone)]
pub struct ManagersService {
    repository: Repository,
}

impl ManagersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List managers with their service center
    pub async fn list(&self) -> AppResult<Vec<ManagerDetails>> {
        let managers = self.repository.managers.list().await?;
        let service_ids: Vec<i32> = managers.iter().filter_map(|m| m.service_id).collect();
        let services = self.repository.service_centers.get_many(&service_ids).await?;

        Ok(managers
            .into_iter()
            .map(|manager| ManagerDetails {
                service: services
                    .iter()
                    .find(|s| Some(s.id) == manager.service_id)
                    .cloned(),
                manager,
            })
            .collect())
    }

    pub async fn get(&self, id: i32) -> AppResult<ManagerDetails> {
        let manager = self.repository.managers.get_by_id(id).await?;
        let service = match manager.service_id {
            Some(service_id) => Some(self.repository.service_centers.get_by_id(service_id).await?),
            None => None,
        };
        Ok(ManagerDetails { manager, service })
    }

    /// Create a manager. A service center has at most one manager.
    pub async fn create(&self, data: CreateManager) -> AppResult<Manager> {
        data.validate()?;
        if let Some(service_id) = data.service_id {
            self.ensure_vacant(service_id, None).await?;
        }
        let hash = hash_password(&data.password)?;
        let manager = self.repository.managers.create(&data, &hash).await?;
        tracing::info!(manager_id = manager.id, service_id = ?manager.service_id, "Manager created");
        Ok(manager)
    }

    pub async fn update(&self, id: i32, data: UpdateManager) -> AppResult<Manager> {
        data.validate()?;
        if let Some(Some(service_id)) = data.service_id {
            self.ensure_vacant(service_id, Some(id)).await?;
        }
        let hash = data.password.as_deref().map(hash_password).transpose()?;
        self.repository.managers.update(id, &data, hash).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.managers.delete(id).await?;
        tracing::info!(manager_id = id, "Manager deleted");
        Ok(())
    }

    /// The service center must exist and be run by nobody else
    async fn ensure_vacant(&self, service_id: i32, manager_id: Option<i32>) -> AppResult<()> {
        if !self.repository.service_centers.exists(service_id).await? {
            return Err(AppError::NotFound(format!("Service {} not found", service_id)));
        }
        if let Some(current) = self.repository.managers.get_by_service(service_id).await? {
            if Some(current.id) != manager_id {
                return Err(AppError::Conflict(format!(
                    "Service {} already has manager {}",
                    service_id, current.id
                )));
            }
        }
        Ok(())
    }
}
