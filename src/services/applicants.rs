//! Applicant management service

use validator::Validate;

use super::accounts::hash_password;
use crate::{
    error::AppResult,
    models::applicant::{Applicant, ApplicantDetails, CreateApplicant, UpdateApplicant},
    repository::Repository,
};

#[derive(Clone)]
pub struct ApplicantsService {
    repository: Repository,
}

impl ApplicantsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List applicants with the requests they filed
    pub async fn list(&self) -> AppResult<Vec<ApplicantDetails>> {
        let applicants = self.repository.applicants.list().await?;
        let ids: Vec<i32> = applicants.iter().map(|a| a.id).collect();
        let requests = self.repository.requests.list_where("applicant_id", &ids).await?;

        Ok(applicants
            .into_iter()
            .map(|applicant| ApplicantDetails {
                requests: requests
                    .iter()
                    .filter(|r| r.applicant_id == applicant.id)
                    .cloned()
                    .collect(),
                applicant,
            })
            .collect())
    }

    pub async fn get(&self, id: i32) -> AppResult<ApplicantDetails> {
        let applicant = self.repository.applicants.get_by_id(id).await?;
        let requests = self.repository.requests.list_by_applicant(id).await?;
        Ok(ApplicantDetails { applicant, requests })
    }

    pub async fn create(&self, data: CreateApplicant) -> AppResult<Applicant> {
        data.validate()?;
        let hash = hash_password(&data.password)?;
        let applicant = self.repository.applicants.create(&data, &hash).await?;
        tracing::info!(applicant_id = applicant.id, "Applicant created");
        Ok(applicant)
    }

    pub async fn update(&self, id: i32, data: UpdateApplicant) -> AppResult<Applicant> {
        data.validate()?;
        let hash = data.password.as_deref().map(hash_password).transpose()?;
        self.repository.applicants.update(id, &data, hash).await
    }

    /// Delete an applicant that has no requests left
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.applicants.delete(id).await?;
        tracing::info!(applicant_id = id, "Applicant deleted");
        Ok(())
    }
}
