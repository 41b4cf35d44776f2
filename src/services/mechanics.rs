//! Mechanic management service

use validator::Validate;

use super::{accounts::hash_password, cascade::CascadeService};
use crate::{
    error::{AppError, AppResult},
    models::mechanic::{CreateMechanic, Mechanic, MechanicDetails, UpdateMechanic},
    repository::Repository,
};

#[derive(Clone)]
pub struct MechanicsService {
    repository: Repository,
    cascade: CascadeService,
}

impl MechanicsService {
    pub fn new(repository: Repository, cascade: CascadeService) -> Self {
        Self { repository, cascade }
    }

    /// List mechanics with their requests and service center
    pub async fn list(&self) -> AppResult<Vec<MechanicDetails>> {
        let mechanics = self.repository.mechanics.list().await?;
        let ids: Vec<i32> = mechanics.iter().map(|m| m.id).collect();
        let service_ids: Vec<i32> = mechanics.iter().filter_map(|m| m.service_id).collect();

        let requests = self.repository.requests.list_where("mechanic_id", &ids).await?;
        let services = self.repository.service_centers.get_many(&service_ids).await?;

        Ok(mechanics
            .into_iter()
            .map(|mechanic| MechanicDetails {
                requests: requests
                    .iter()
                    .filter(|r| r.mechanic_id == Some(mechanic.id))
                    .cloned()
                    .collect(),
                service: services
                    .iter()
                    .find(|s| Some(s.id) == mechanic.service_id)
                    .cloned(),
                mechanic,
            })
            .collect())
    }

    pub async fn get(&self, id: i32) -> AppResult<MechanicDetails> {
        let mechanic = self.repository.mechanics.get_by_id(id).await?;
        let requests = self.repository.requests.list_by_mechanic(id).await?;
        let service = match mechanic.service_id {
            Some(service_id) => Some(self.repository.service_centers.get_by_id(service_id).await?),
            None => None,
        };
        Ok(MechanicDetails {
            mechanic,
            requests,
            service,
        })
    }

    pub async fn create(&self, data: CreateMechanic) -> AppResult<Mechanic> {
        data.validate()?;
        if let Some(service_id) = data.service_id {
            self.ensure_service(service_id).await?;
        }
        let hash = hash_password(&data.password)?;
        let mechanic = self.repository.mechanics.create(&data, &hash).await?;
        tracing::info!(mechanic_id = mechanic.id, service_id = ?mechanic.service_id, "Mechanic created");
        Ok(mechanic)
    }

    pub async fn update(&self, id: i32, data: UpdateMechanic) -> AppResult<Mechanic> {
        data.validate()?;
        if let Some(Some(service_id)) = data.service_id {
            self.ensure_service(service_id).await?;
        }
        let hash = data.password.as_deref().map(hash_password).transpose()?;
        self.repository.mechanics.update(id, &data, hash).await
    }

    /// Unassign the mechanic's requests, then delete the mechanic
    pub async fn delete(&self, id: i32) -> AppResult<Mechanic> {
        self.cascade.delete_mechanic(id).await
    }

    async fn ensure_service(&self, service_id: i32) -> AppResult<()> {
        if !self.repository.service_centers.exists(service_id).await? {
            return Err(AppError::NotFound(format!("Service {} not found", service_id)));
        }
        Ok(())
    }
}
