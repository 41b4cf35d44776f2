//! Repair request service: creation, partial updates and status transitions

use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::request::{CreateRequest, Request, RequestChanges, RequestDetails, UpdateRequest},
    repository::Repository,
};

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
}

impl RequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<RequestDetails>> {
        let requests = self.repository.requests.list().await?;
        self.expand(requests).await
    }

    pub async fn get(&self, id: i32) -> AppResult<RequestDetails> {
        let request = self.repository.requests.get_by_id(id).await?;
        self.expand_one(request).await
    }

    /// File a new request. Transport and applicant are mandatory and must
    /// exist, as must the mechanic and service when given.
    pub async fn create(&self, data: CreateRequest) -> AppResult<RequestDetails> {
        data.validate()?;

        if !self.repository.transports.exists(data.transport_id).await? {
            return Err(AppError::NotFound(format!("Transport {} not found", data.transport_id)));
        }
        if !self.repository.applicants.exists(data.applicant_id).await? {
            return Err(AppError::NotFound(format!("Applicant {} not found", data.applicant_id)));
        }
        self.check_assignment(data.mechanic_id, data.service_id).await?;

        let (status, closed_at) = data.initial_state(Utc::now());
        let request = self.repository.requests.create(&data, &status, closed_at).await?;
        tracing::info!(
            request_id = request.id,
            applicant_id = request.applicant_id,
            status = %request.status,
            "Request created"
        );
        self.expand_one(request).await
    }

    /// Partial update. A `status` in the patch goes through the transition
    /// table; a lone `closedAt` is written as given.
    pub async fn update(&self, id: i32, patch: UpdateRequest) -> AppResult<RequestDetails> {
        let changes = RequestChanges::resolve(patch, Utc::now());
        self.apply(id, changes).await
    }

    /// Status transition. Same as [`update`](Self::update) but `status` is
    /// required.
    pub async fn set_status(&self, id: i32, patch: UpdateRequest) -> AppResult<RequestDetails> {
        if patch.status.is_none() {
            return Err(AppError::Validation("status is required".to_string()));
        }
        let changes = RequestChanges::resolve(patch, Utc::now());
        self.apply(id, changes).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.requests.delete(id).await?;
        tracing::info!(request_id = id, "Request deleted");
        Ok(())
    }

    async fn apply(&self, id: i32, changes: RequestChanges) -> AppResult<RequestDetails> {
        if changes.problem.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(AppError::Validation("problem must not be empty".to_string()));
        }

        // Fail before writing anything
        let current = self.repository.requests.get_by_id(id).await?;
        self.check_assignment(
            changes.mechanic_id.flatten(),
            changes.service_id.flatten(),
        )
        .await?;

        let request = if changes.is_empty() {
            current
        } else {
            self.repository.requests.update(id, &changes).await?
        };

        if let Some(status) = &changes.status {
            tracing::info!(
                request_id = id,
                status = %status,
                closed_at = ?request.closed_at,
                "Request status changed"
            );
        }
        self.expand_one(request).await
    }

    async fn check_assignment(&self, mechanic_id: Option<i32>, service_id: Option<i32>) -> AppResult<()> {
        if let Some(mechanic_id) = mechanic_id {
            if !self.repository.mechanics.exists(mechanic_id).await? {
                return Err(AppError::NotFound(format!("Mechanic {} not found", mechanic_id)));
            }
        }
        if let Some(service_id) = service_id {
            if !self.repository.service_centers.exists(service_id).await? {
                return Err(AppError::NotFound(format!("Service {} not found", service_id)));
            }
        }
        Ok(())
    }

    async fn expand_one(&self, request: Request) -> AppResult<RequestDetails> {
        let mut expanded = self.expand(vec![request]).await?;
        expanded
            .pop()
            .ok_or_else(|| AppError::Internal("Request expansion returned nothing".to_string()))
    }

    /// Attach applicant, mechanic, transport and service, one query per table
    async fn expand(&self, requests: Vec<Request>) -> AppResult<Vec<RequestDetails>> {
        let applicant_ids: Vec<i32> = requests.iter().map(|r| r.applicant_id).collect();
        let transport_ids: Vec<i32> = requests.iter().map(|r| r.transport_id).collect();
        let mechanic_ids: Vec<i32> = requests.iter().filter_map(|r| r.mechanic_id).collect();
        let service_ids: Vec<i32> = requests.iter().filter_map(|r| r.service_id).collect();

        let applicants = self.repository.applicants.get_many(&applicant_ids).await?;
        let transports = self.repository.transports.get_many(&transport_ids).await?;
        let mechanics = self.repository.mechanics.get_many(&mechanic_ids).await?;
        let services = self.repository.service_centers.get_many(&service_ids).await?;

        Ok(requests
            .into_iter()
            .map(|request| RequestDetails {
                applicant: applicants.iter().find(|a| a.id == request.applicant_id).cloned(),
                mechanic: mechanics
                    .iter()
                    .find(|m| Some(m.id) == request.mechanic_id)
                    .cloned(),
                transport: transports.iter().find(|t| t.id == request.transport_id).cloned(),
                service: services
                    .iter()
                    .find(|s| Some(s.id) == request.service_id)
                    .cloned(),
                request,
            })
            .collect())
    }
}
