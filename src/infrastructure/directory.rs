//! # Supplier Directory
//!
//! Lookup of supplier accounts, consulted before admitting a quote.
//!
//! The engine does not own supplier master data; it only needs to know
//! whether a supplier exists and is active. Deactivated suppliers keep
//! their historical quotes but cannot submit new ones.

use crate::domain::value_objects::ids::SupplierId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors from directory lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// Backend failure.
    #[error("directory backend error: {0}")]
    Backend(String),
}

/// A supplier's directory record as the engine sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplierStatus {
    /// Known and allowed to quote.
    Active,
    /// Known but not allowed to quote.
    Inactive,
    /// Not in the directory at all.
    Unknown,
}

/// Read-only view of supplier accounts.
#[async_trait]
pub trait SupplierDirectory: Send + Sync + fmt::Debug {
    /// Looks up a supplier's status.
    ///
    /// # Errors
    ///
    /// Returns a [`DirectoryError`] on backend failure.
    async fn status_of(&self, supplier_id: &SupplierId) -> Result<SupplierStatus, DirectoryError>;
}

/// In-memory [`SupplierDirectory`] for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct InMemorySupplierDirectory {
    suppliers: Arc<RwLock<HashMap<SupplierId, bool>>>,
}

impl InMemorySupplierDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory pre-registered with the given active suppliers.
    #[must_use]
    pub fn with_active(suppliers: impl IntoIterator<Item = SupplierId>) -> Self {
        let map = suppliers.into_iter().map(|id| (id, true)).collect();
        Self {
            suppliers: Arc::new(RwLock::new(map)),
        }
    }

    /// Registers or re-activates a supplier.
    pub async fn register(&self, supplier_id: SupplierId) {
        self.suppliers.write().await.insert(supplier_id, true);
    }

    /// Deactivates a supplier, keeping it known.
    pub async fn deactivate(&self, supplier_id: &SupplierId) {
        if let Some(active) = self.suppliers.write().await.get_mut(supplier_id) {
            *active = false;
        }
    }
}

#[async_trait]
impl SupplierDirectory for InMemorySupplierDirectory {
    async fn status_of(&self, supplier_id: &SupplierId) -> Result<SupplierStatus, DirectoryError> {
        let suppliers = self.suppliers.read().await;
        Ok(match suppliers.get(supplier_id) {
            Some(true) => SupplierStatus::Active,
            Some(false) => SupplierStatus::Inactive,
            None => SupplierStatus::Unknown,
        })
    }
}
