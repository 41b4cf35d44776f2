//! Transport management service

use validator::Validate;

use crate::{
    error::AppResult,
    models::transport::{CreateTransport, Transport, TransportDetails, UpdateTransport},
    repository::Repository,
};

#[derive(Clone)]
pub struct TransportsService {
    repository: Repository,
}

impl TransportsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<TransportDetails>> {
        let transports = self.repository.transports.list().await?;
        let ids: Vec<i32> = transports.iter().map(|t| t.id).collect();
        let requests = self.repository.requests.list_where("transport_id", &ids).await?;

        Ok(transports
            .into_iter()
            .map(|transport| TransportDetails {
                requests: requests
                    .iter()
                    .filter(|r| r.transport_id == transport.id)
                    .cloned()
                    .collect(),
                transport,
            })
            .collect())
    }

    pub async fn get(&self, id: i32) -> AppResult<TransportDetails> {
        let transport = self.repository.transports.get_by_id(id).await?;
        let requests = self.repository.requests.list_by_transport(id).await?;
        Ok(TransportDetails { transport, requests })
    }

    pub async fn create(&self, data: CreateTransport) -> AppResult<Transport> {
        data.validate()?;
        self.repository.transports.create(&data).await
    }

    pub async fn update(&self, id: i32, data: UpdateTransport) -> AppResult<Transport> {
        data.validate()?;
        self.repository.transports.update(id, &data).await
    }

    /// Delete a transport that no request refers to
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.transports.delete(id).await
    }
}
