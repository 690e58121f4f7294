//! # In-Memory RFQ Repository
//!
//! In-memory implementation of [`RfqRepository`] for tests and embedding.
//!
//! Uses a thread-safe `HashMap` keyed by [`RfqId`]. The compare-and-swap in
//! [`RfqRepository::update`] holds the write lock for the whole check, so
//! two concurrent writers racing on the same aggregate produce exactly one
//! success and one [`RepositoryError::VersionConflict`].
//!
//! # Examples
//!
//! ```
//! use rfq_engine::infrastructure::persistence::in_memory::InMemoryRfqRepository;
//!
//! let repo = InMemoryRfqRepository::new();
//! assert!(repo.is_empty());
//! ```

use crate::domain::entities::rfq::Rfq;
use crate::domain::value_objects::ids::{RfqId, TenantId};
use crate::domain::value_objects::rfq_number::RfqNumber;
use crate::infrastructure::persistence::traits::{
    RepositoryError, RepositoryResult, RfqRepository,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`RfqRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryRfqRepository {
    storage: Arc<RwLock<HashMap<RfqId, Rfq>>>,
}

impl InMemoryRfqRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored aggregates.
    #[must_use]
    pub fn len(&self) -> usize {
        // try_read keeps this callable from sync contexts
        self.storage
            .try_read()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    /// Returns true if the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every stored aggregate.
    pub async fn clear(&self) {
        self.storage.write().await.clear();
    }
}

#[async_trait]
impl RfqRepository for InMemoryRfqRepository {
    async fn insert(&self, rfq: &Rfq) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        if storage.contains_key(&rfq.id()) {
            return Err(RepositoryError::already_exists("Rfq", rfq.id()));
        }
        storage.insert(rfq.id(), rfq.clone());
        Ok(())
    }

    async fn get(&self, id: RfqId) -> RepositoryResult<Option<Rfq>> {
        let storage = self.storage.read().await;
        Ok(storage.get(&id).cloned())
    }

    async fn update(&self, rfq: &Rfq, expected_version: u64) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        let stored = storage
            .get(&rfq.id())
            .ok_or_else(|| RepositoryError::not_found("Rfq", rfq.id()))?;
        if stored.version() != expected_version {
            return Err(RepositoryError::version_conflict(
                "Rfq",
                rfq.id(),
                expected_version,
                stored.version(),
            ));
        }
        storage.insert(rfq.id(), rfq.clone());
        Ok(())
    }

    async fn find_by_number(
        &self,
        tenant_id: &TenantId,
        number: &RfqNumber,
    ) -> RepositoryResult<Option<Rfq>> {
        let storage = self.storage.read().await;
        Ok(storage
            .values()
            .find(|rfq| rfq.tenant_id() == tenant_id && rfq.number() == number)
            .cloned())
    }

    async fn find_by_tenant(&self, tenant_id: &TenantId) -> RepositoryResult<Vec<Rfq>> {
        let storage = self.storage.read().await;
        let mut rfqs: Vec<Rfq> = storage
            .values()
            .filter(|rfq| rfq.tenant_id() == tenant_id)
            .cloned()
            .collect();
        rfqs.sort_by(|a, b| a.number().cmp(b.number()));
        Ok(rfqs)
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let storage = self.storage.read().await;
        Ok(storage.len() as u64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::rfq::ItemRequirement;
    use crate::domain::value_objects::criteria::SelectionCriteria;
    use crate::domain::value_objects::ids::BuyerId;
    use crate::domain::value_objects::timestamp::Timestamp;

    fn create_test_rfq(tenant: &str, sequence: u32) -> Rfq {
        let now = Timestamp::now();
        Rfq::builder(
            TenantId::new(tenant),
            RfqNumber::format("RFQ", "2608", sequence).unwrap(),
            BuyerId::new("buyer-1"),
            format!("Fixture {sequence}"),
        )
        .item(ItemRequirement::new("widget", 10, "pcs"))
        .criteria(SelectionCriteria::price_only())
        .timeline(now, now.add_days(14), now.add_days(30))
        .build(now)
        .unwrap()
    }

    #[tokio::test]
    async fn new_repository_is_empty() {
        let repo = InMemoryRfqRepository::new();
        assert!(repo.is_empty());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn insert_and_get() {
        let repo = InMemoryRfqRepository::new();
        let rfq = create_test_rfq("acme", 1);
        let id = rfq.id();

        repo.insert(&rfq).await.unwrap();
        let retrieved = repo.get(id).await.unwrap().unwrap();
        assert_eq!(retrieved.id(), id);
        assert_eq!(retrieved.version(), rfq.version());
    }

    #[tokio::test]
    async fn double_insert_is_rejected() {
        let repo = InMemoryRfqRepository::new();
        let rfq = create_test_rfq("acme", 1);
        repo.insert(&rfq).await.unwrap();
        assert!(matches!(
            repo.insert(&rfq).await,
            Err(RepositoryError::AlreadyExists { .. })
        ));
    }

    #[tokio::test]
    async fn get_nonexistent_returns_none() {
        let repo = InMemoryRfqRepository::new();
        assert!(repo.get(RfqId::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_with_matching_version_succeeds() {
        let repo = InMemoryRfqRepository::new();
        let mut rfq = create_test_rfq("acme", 1);
        repo.insert(&rfq).await.unwrap();

        let read_version = rfq.version();
        let now = Timestamp::now();
        rfq.publish("buyer-1", now).unwrap();
        repo.update(&rfq, read_version).await.unwrap();

        let stored = repo.get(rfq.id()).await.unwrap().unwrap();
        assert_eq!(stored.version(), read_version + 1);
    }

    #[tokio::test]
    async fn update_with_stale_version_conflicts() {
        let repo = InMemoryRfqRepository::new();
        let mut rfq = create_test_rfq("acme", 1);
        repo.insert(&rfq).await.unwrap();
        let read_version = rfq.version();

        let now = Timestamp::now();
        rfq.publish("buyer-1", now).unwrap();
        repo.update(&rfq, read_version).await.unwrap();

        // A second writer still holding the original version loses.
        let err = repo.update(&rfq, read_version).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn update_missing_aggregate_is_not_found() {
        let repo = InMemoryRfqRepository::new();
        let rfq = create_test_rfq("acme", 1);
        assert!(matches!(
            repo.update(&rfq, 1).await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn find_by_number_is_tenant_scoped() {
        let repo = InMemoryRfqRepository::new();
        let rfq = create_test_rfq("acme", 7);
        repo.insert(&rfq).await.unwrap();

        let number = rfq.number().clone();
        let hit = repo
            .find_by_number(&TenantId::new("acme"), &number)
            .await
            .unwrap();
        assert!(hit.is_some());
        let miss = repo
            .find_by_number(&TenantId::new("globex"), &number)
            .await
            .unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn find_by_tenant_orders_by_number() {
        let repo = InMemoryRfqRepository::new();
        repo.insert(&create_test_rfq("acme", 3)).await.unwrap();
        repo.insert(&create_test_rfq("acme", 1)).await.unwrap();
        repo.insert(&create_test_rfq("globex", 2)).await.unwrap();

        let rfqs = repo.find_by_tenant(&TenantId::new("acme")).await.unwrap();
        assert_eq!(rfqs.len(), 2);
        assert!(rfqs[0].number() < rfqs[1].number());
    }
}
