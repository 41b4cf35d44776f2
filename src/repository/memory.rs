//! In-memory [`CascadeStore`] for tests
//!
//! A transaction works on a copy of the tables and swaps it in on commit, so
//! an aborted cascade leaves the store exactly as it was. Faults can be
//! injected at any step.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use super::{CascadeStore, CascadeTx};
use crate::{
    error::{AppError, AppResult},
    models::{Manager, Mechanic, Request, RequestStatus, ServiceCenter},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tables {
    pub services: BTreeMap<i32, ServiceCenter>,
    pub mechanics: BTreeMap<i32, Mechanic>,
    pub managers: BTreeMap<i32, Manager>,
    pub requests: BTreeMap<i32, Request>,
}

impl Tables {
    pub fn add_service(&mut self, id: i32) {
        self.services.insert(
            id,
            ServiceCenter {
                id,
                address: format!("ул. Заводская, {}", id),
                work_time: "09:00-18:00".to_string(),
            },
        );
    }

    pub fn add_mechanic(&mut self, id: i32, service_id: Option<i32>) {
        self.mechanics.insert(
            id,
            Mechanic {
                id,
                name: format!("mechanic {}", id),
                email: format!("mechanic{}@example.com", id),
                password: String::new(),
                photo: None,
                service_id,
            },
        );
    }

    pub fn add_manager(&mut self, id: i32, service_id: Option<i32>) {
        self.managers.insert(
            id,
            Manager {
                id,
                name: format!("manager {}", id),
                email: format!("manager{}@example.com", id),
                password: String::new(),
                photo: None,
                service_id,
            },
        );
    }

    pub fn add_request(&mut self, id: i32, mechanic_id: Option<i32>, service_id: Option<i32>) {
        self.requests.insert(
            id,
            Request {
                id,
                problem: format!("problem {}", id),
                status: RequestStatus::New,
                submitted_at: Utc::now(),
                closed_at: None,
                transport_id: 1,
                applicant_id: 1,
                mechanic_id,
                service_id,
            },
        );
    }
}

/// Cascade steps, in the order the service center cascade runs them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    UnassignServiceMechanics,
    DetachRequests,
    MechanicIds,
    UnassignMechanics,
    DeleteMechanics,
    DeleteManager,
    DeleteService,
    Commit,
}

#[derive(Debug, Clone, Copy)]
struct Fault {
    step: Step,
    /// How many more times the fault fires
    remaining: u32,
    /// Raise a serialization failure instead of a generic internal error
    retryable: bool,
}

#[derive(Default)]
struct Inner {
    tables: Tables,
    fault: Option<Fault>,
    journal: Vec<Step>,
    begun: u32,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new(tables: Tables) -> Self {
        let store = Self::default();
        store.inner.lock().unwrap().tables = tables;
        store
    }

    pub fn tables(&self) -> Tables {
        self.inner.lock().unwrap().tables.clone()
    }

    /// Fail `step` with an internal error every time it runs
    pub fn fail_at(&self, step: Step) {
        self.inner.lock().unwrap().fault = Some(Fault {
            step,
            remaining: u32::MAX,
            retryable: false,
        });
    }

    /// Fail `step` with a serialization failure for the next `times` runs
    pub fn conflict_at(&self, step: Step, times: u32) {
        self.inner.lock().unwrap().fault = Some(Fault {
            step,
            remaining: times,
            retryable: true,
        });
    }

    /// Steps executed so far, across all transactions
    pub fn journal(&self) -> Vec<Step> {
        self.inner.lock().unwrap().journal.clone()
    }

    /// Number of transactions opened
    pub fn transactions_begun(&self) -> u32 {
        self.inner.lock().unwrap().begun
    }

    fn enter(&self, step: Step) -> AppResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.journal.push(step);
        if let Some(fault) = inner.fault.as_mut() {
            if fault.step == step && fault.remaining > 0 {
                fault.remaining -= 1;
                return Err(if fault.retryable {
                    serialization_failure()
                } else {
                    AppError::Internal(format!("injected failure at {:?}", step))
                });
            }
        }
        Ok(())
    }
}

/// Error shaped like PostgreSQL's SQLSTATE 40001
pub fn serialization_failure() -> AppError {
    AppError::from(sqlx::Error::Database(Box::new(SerializationFailure)))
}

#[derive(Debug)]
struct SerializationFailure;

impl std::fmt::Display for SerializationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("could not serialize access due to concurrent update")
    }
}

impl std::error::Error for SerializationFailure {}

impl sqlx::error::DatabaseError for SerializationFailure {
    fn message(&self) -> &str {
        "could not serialize access due to concurrent update"
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed("40001"))
    }

    fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self
    }

    fn kind(&self) -> sqlx::error::ErrorKind {
        sqlx::error::ErrorKind::Other
    }
}

struct MemoryTx {
    store: MemoryStore,
    tables: Tables,
}

#[async_trait]
impl CascadeTx for MemoryTx {
    async fn unassign_service_mechanics(&mut self, service_id: i32) -> AppResult<u64> {
        self.store.enter(Step::UnassignServiceMechanics)?;
        let staff: Vec<i32> = self
            .tables
            .mechanics
            .values()
            .filter(|m| m.service_id == Some(service_id))
            .map(|m| m.id)
            .collect();
        Ok(clear_mechanic(&mut self.tables, &staff))
    }

    async fn detach_requests(&mut self, service_id: i32) -> AppResult<u64> {
        self.store.enter(Step::DetachRequests)?;
        let mut touched = 0;
        for request in self.tables.requests.values_mut() {
            if request.service_id == Some(service_id) {
                request.service_id = None;
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn mechanic_ids(&mut self, service_id: i32) -> AppResult<Vec<i32>> {
        self.store.enter(Step::MechanicIds)?;
        Ok(self
            .tables
            .mechanics
            .values()
            .filter(|m| m.service_id == Some(service_id))
            .map(|m| m.id)
            .collect())
    }

    async fn unassign_mechanics(&mut self, mechanic_ids: &[i32]) -> AppResult<u64> {
        self.store.enter(Step::UnassignMechanics)?;
        Ok(clear_mechanic(&mut self.tables, mechanic_ids))
    }

    async fn delete_mechanics(&mut self, service_id: i32) -> AppResult<u64> {
        self.store.enter(Step::DeleteMechanics)?;
        let before = self.tables.mechanics.len();
        self.tables
            .mechanics
            .retain(|_, m| m.service_id != Some(service_id));
        Ok((before - self.tables.mechanics.len()) as u64)
    }

    async fn delete_manager(&mut self, service_id: i32) -> AppResult<u64> {
        self.store.enter(Step::DeleteManager)?;
        let before = self.tables.managers.len();
        self.tables
            .managers
            .retain(|_, m| m.service_id != Some(service_id));
        Ok((before - self.tables.managers.len()) as u64)
    }

    async fn delete_service(&mut self, service_id: i32) -> AppResult<ServiceCenter> {
        self.store.enter(Step::DeleteService)?;
        let referenced = self
            .tables
            .requests
            .values()
            .any(|r| r.service_id == Some(service_id))
            || self
                .tables
                .mechanics
                .values()
                .any(|m| m.service_id == Some(service_id))
            || self
                .tables
                .managers
                .values()
                .any(|m| m.service_id == Some(service_id));
        if referenced {
            return Err(AppError::Conflict(format!(
                "Service {} is still referenced",
                service_id
            )));
        }
        self.tables
            .services
            .remove(&service_id)
            .ok_or_else(|| AppError::NotFound(format!("Service {} not found", service_id)))
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryTx { store, tables } = *self;
        store.enter(Step::Commit)?;
        store.inner.lock().unwrap().tables = tables;
        Ok(())
    }
}

fn clear_mechanic(tables: &mut Tables, mechanic_ids: &[i32]) -> u64 {
    let mut touched = 0;
    for request in tables.requests.values_mut() {
        if request.mechanic_id.is_some_and(|id| mechanic_ids.contains(&id)) {
            request.mechanic_id = None;
            touched += 1;
        }
    }
    touched
}

#[async_trait]
impl CascadeStore for MemoryStore {
    async fn begin_cascade(&self) -> AppResult<Box<dyn CascadeTx>> {
        let tables = {
            let mut inner = self.inner.lock().unwrap();
            inner.begun += 1;
            inner.tables.clone()
        };
        Ok(Box::new(MemoryTx {
            store: self.clone(),
            tables,
        }))
    }

    async fn unassign_mechanic(&self, mechanic_id: i32) -> AppResult<u64> {
        let mut inner = self.inner.lock().unwrap();
        Ok(clear_mechanic(&mut inner.tables, &[mechanic_id]))
    }

    async fn delete_mechanic(&self, mechanic_id: i32) -> AppResult<Mechanic> {
        let mut inner = self.inner.lock().unwrap();
        if inner
            .tables
            .requests
            .values()
            .any(|r| r.mechanic_id == Some(mechanic_id))
        {
            return Err(AppError::Conflict(format!(
                "Mechanic {} is still referenced",
                mechanic_id
            )));
        }
        inner
            .tables
            .mechanics
            .remove(&mechanic_id)
            .ok_or_else(|| AppError::NotFound(format!("Mechanic {} not found", mechanic_id)))
    }
}
