//! Reference-repairing deletes of service centers and mechanics

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Mechanic, ServiceCenter},
    repository::{CascadeStore, CascadeTx},
};

#[derive(Clone)]
pub struct CascadeService {
    store: Arc<dyn CascadeStore>,
    /// Replays allowed after a serialization failure
    retries: u32,
}

impl CascadeService {
    pub fn new(store: Arc<dyn CascadeStore>, retries: u32) -> Self {
        Self { store, retries }
    }

    /// Delete a service center together with its mechanics and manager,
    /// unassigning every request that pointed at any of them. All or nothing.
    pub async fn delete_service_center(&self, service_id: i32) -> AppResult<ServiceCenter> {
        let mut attempt = 0;
        loop {
            match self.try_delete_service_center(service_id).await {
                Err(e) if e.is_serialization_failure() && attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!(
                        service_id,
                        attempt,
                        "Service cascade hit a serialization failure, retrying"
                    );
                }
                Err(e) if e.is_serialization_failure() => {
                    return Err(AppError::Conflict(format!(
                        "Service {} is being modified concurrently, try again",
                        service_id
                    )));
                }
                other => return other,
            }
        }
    }

    async fn try_delete_service_center(&self, service_id: i32) -> AppResult<ServiceCenter> {
        let mut tx = self.store.begin_cascade().await?;
        // An early return drops `tx`, which rolls back everything done so far
        let deleted = run_service_cascade(tx.as_mut(), service_id).await?;
        tx.commit().await?;

        tracing::info!(service_id, "Service deleted with its staff");
        Ok(deleted)
    }

    /// Unassign a mechanic's requests, then delete the mechanic. Not atomic:
    /// if the delete fails the requests simply stay unassigned.
    pub async fn delete_mechanic(&self, mechanic_id: i32) -> AppResult<Mechanic> {
        let unassigned = self.store.unassign_mechanic(mechanic_id).await?;
        tracing::debug!(mechanic_id, unassigned, "Requests unassigned from mechanic");

        let mechanic = self.store.delete_mechanic(mechanic_id).await?;
        tracing::info!(mechanic_id, "Mechanic deleted");
        Ok(mechanic)
    }
}

async fn run_service_cascade(tx: &mut dyn CascadeTx, service_id: i32) -> AppResult<ServiceCenter> {
    let unassigned = tx.unassign_service_mechanics(service_id).await?;
    let detached = tx.detach_requests(service_id).await?;

    // Second pass over the mechanic set as seen by this transaction
    let staff = tx.mechanic_ids(service_id).await?;
    let reassigned = tx.unassign_mechanics(&staff).await?;

    let mechanics = tx.delete_mechanics(service_id).await?;
    let managers = tx.delete_manager(service_id).await?;
    tracing::debug!(
        service_id,
        unassigned = unassigned + reassigned,
        detached,
        mechanics,
        managers,
        "Service dependants repaired"
    );

    tx.delete_service(service_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{
        cascade::MockCascadeStore,
        memory::{MemoryStore, Step, Tables},
    };
    use mockall::Sequence;

    /// Service 1: manager 10, mechanics 20 and 21. Service 2: manager 11,
    /// mechanic 22. Mechanic 23 is freelance.
    fn fixture() -> Tables {
        let mut t = Tables::default();
        t.add_service(1);
        t.add_service(2);
        t.add_manager(10, Some(1));
        t.add_manager(11, Some(2));
        t.add_mechanic(20, Some(1));
        t.add_mechanic(21, Some(1));
        t.add_mechanic(22, Some(2));
        t.add_mechanic(23, None);
        // assigned to a mechanic of service 1 and handled by service 1
        t.add_request(100, Some(20), Some(1));
        // mechanic of service 1, handled by service 2
        t.add_request(101, Some(21), Some(2));
        // service 1 only
        t.add_request(102, None, Some(1));
        // untouched by a service 1 delete
        t.add_request(103, Some(22), Some(2));
        t.add_request(104, Some(23), None);
        t
    }

    fn cascade(store: &MemoryStore) -> CascadeService {
        CascadeService::new(Arc::new(store.clone()), 3)
    }

    #[tokio::test]
    async fn deletes_service_with_staff_and_repairs_requests() {
        let store = MemoryStore::new(fixture());

        let deleted = cascade(&store).delete_service_center(1).await.unwrap();
        assert_eq!(deleted.id, 1);
        assert_eq!(deleted.address, "ул. Заводская, 1");

        let t = store.tables();
        assert!(!t.services.contains_key(&1));
        assert!(!t.managers.contains_key(&10));
        assert!(!t.mechanics.contains_key(&20));
        assert!(!t.mechanics.contains_key(&21));

        assert_eq!(t.requests[&100].mechanic_id, None);
        assert_eq!(t.requests[&100].service_id, None);
        assert_eq!(t.requests[&101].mechanic_id, None);
        assert_eq!(t.requests[&101].service_id, Some(2));
        assert_eq!(t.requests[&102].service_id, None);

        // other service untouched
        assert!(t.services.contains_key(&2));
        assert!(t.managers.contains_key(&11));
        assert!(t.mechanics.contains_key(&22));
        assert!(t.mechanics.contains_key(&23));
        assert_eq!(t.requests[&103].mechanic_id, Some(22));
        assert_eq!(t.requests[&104].mechanic_id, Some(23));
    }

    #[tokio::test]
    async fn leaves_no_reference_to_the_deleted_service() {
        let store = MemoryStore::new(fixture());
        cascade(&store).delete_service_center(1).await.unwrap();

        let t = store.tables();
        assert!(t.requests.values().all(|r| r.service_id != Some(1)));
        assert!(t.mechanics.values().all(|m| m.service_id != Some(1)));
        assert!(t.managers.values().all(|m| m.service_id != Some(1)));
        for request in t.requests.values() {
            if let Some(mechanic_id) = request.mechanic_id {
                assert!(t.mechanics.contains_key(&mechanic_id));
            }
        }
    }

    #[tokio::test]
    async fn runs_the_steps_in_order() {
        let store = MemoryStore::new(fixture());
        cascade(&store).delete_service_center(2).await.unwrap();
        assert_eq!(
            store.journal(),
            vec![
                Step::UnassignServiceMechanics,
                Step::DetachRequests,
                Step::MechanicIds,
                Step::UnassignMechanics,
                Step::DeleteMechanics,
                Step::DeleteManager,
                Step::DeleteService,
                Step::Commit,
            ]
        );
    }

    #[tokio::test]
    async fn service_without_staff_is_deleted() {
        let mut t = Tables::default();
        t.add_service(7);
        let store = MemoryStore::new(t);

        let deleted = cascade(&store).delete_service_center(7).await.unwrap();
        assert_eq!(deleted.id, 7);
        assert!(store.tables().services.is_empty());
    }

    #[tokio::test]
    async fn missing_service_is_not_found_and_changes_nothing() {
        let store = MemoryStore::new(fixture());
        let before = store.tables();

        let err = cascade(&store).delete_service_center(99).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(store.tables(), before);
    }

    #[tokio::test]
    async fn second_delete_reports_not_found() {
        let store = MemoryStore::new(fixture());
        let service = cascade(&store);

        service.delete_service_center(1).await.unwrap();
        let after_first = store.tables();

        let err = service.delete_service_center(1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(store.tables(), after_first);
    }

    #[tokio::test]
    async fn failure_mid_cascade_rolls_everything_back() {
        for step in [Step::DeleteMechanics, Step::DeleteManager, Step::Commit] {
            let store = MemoryStore::new(fixture());
            let before = store.tables();
            store.fail_at(step);

            let err = cascade(&store).delete_service_center(1).await.unwrap_err();
            assert!(matches!(err, AppError::Internal(_)), "step {:?}", step);
            assert_eq!(store.tables(), before, "step {:?}", step);
        }
    }

    #[tokio::test]
    async fn serialization_failures_are_retried() {
        let store = MemoryStore::new(fixture());
        store.conflict_at(Step::DeleteService, 2);

        let deleted = cascade(&store).delete_service_center(1).await.unwrap();
        assert_eq!(deleted.id, 1);
        assert_eq!(store.transactions_begun(), 3);
        assert!(!store.tables().services.contains_key(&1));
    }

    #[tokio::test]
    async fn retry_after_a_concurrent_delete_reports_not_found() {
        let store = MemoryStore::new(fixture());
        let service = cascade(&store);
        service.delete_service_center(1).await.unwrap();

        // The replay sees the row already gone
        store.conflict_at(Step::UnassignServiceMechanics, 1);
        let err = service.delete_service_center(1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn exhausted_retries_surface_a_conflict() {
        let store = MemoryStore::new(fixture());
        let before = store.tables();
        store.conflict_at(Step::DetachRequests, 10);

        let err = CascadeService::new(Arc::new(store.clone()), 1)
            .delete_service_center(1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.transactions_begun(), 2);
        assert_eq!(store.tables(), before);
    }

    #[tokio::test]
    async fn mechanic_delete_unassigns_requests() {
        let store = MemoryStore::new(fixture());

        let deleted = cascade(&store).delete_mechanic(20).await.unwrap();
        assert_eq!(deleted.id, 20);

        let t = store.tables();
        assert!(!t.mechanics.contains_key(&20));
        assert_eq!(t.requests[&100].mechanic_id, None);
        assert_eq!(t.requests[&100].service_id, Some(1));
        assert_eq!(t.requests[&101].mechanic_id, Some(21));
    }

    #[tokio::test]
    async fn missing_mechanic_is_not_found() {
        let store = MemoryStore::new(fixture());
        let err = cascade(&store).delete_mechanic(404).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn mechanic_references_are_cleared_before_the_delete() {
        let mut mock = MockCascadeStore::new();
        let mut seq = Sequence::new();
        mock.expect_unassign_mechanic()
            .withf(|id| *id == 5)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(2));
        mock.expect_delete_mechanic()
            .withf(|id| *id == 5)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::Internal("disk full".into())));

        let err = CascadeService::new(Arc::new(mock), 0)
            .delete_mechanic(5)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn failed_unassign_skips_the_delete() {
        let mut mock = MockCascadeStore::new();
        mock.expect_unassign_mechanic()
            .returning(|_| Err(AppError::Internal("connection reset".into())));
        mock.expect_delete_mechanic().never();

        let result = CascadeService::new(Arc::new(mock), 0).delete_mechanic(5).await;
        tokio_test::assert_err!(result);
    }
}
