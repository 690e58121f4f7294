//! # Repository Traits
//!
//! Storage abstractions for the RFQ aggregate.
//!
//! The aggregate (RFQ + quotes + activity log) is one write unit: `update`
//! is a compare-and-swap on the aggregate's `version`, and a mismatch is
//! reported as [`RepositoryError::VersionConflict`]. That is the only
//! retryable error class; the application layer re-reads, re-validates, and
//! retries on it with bounded backoff.

use crate::domain::entities::rfq::Rfq;
use crate::domain::value_objects::ids::{RfqId, TenantId};
use crate::domain::value_objects::rfq_number::RfqNumber;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The aggregate does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind.
        entity: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// An insert collided with an existing aggregate.
    #[error("{entity} {id} already exists")]
    AlreadyExists {
        /// Entity kind.
        entity: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// A compare-and-swap update lost a race; the caller may re-read and
    /// retry.
    #[error("version conflict on {entity} {id}: expected {expected}, stored {stored}")]
    VersionConflict {
        /// Entity kind.
        entity: &'static str,
        /// Entity identifier.
        id: String,
        /// Version the caller read.
        expected: u64,
        /// Version currently stored.
        stored: u64,
    },

    /// Backend failure (connection, serialization, corruption).
    #[error("storage error: {0}")]
    Storage(String),
}

impl RepositoryError {
    /// Convenience constructor for [`RepositoryError::NotFound`].
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`RepositoryError::AlreadyExists`].
    #[must_use]
    pub fn already_exists(entity: &'static str, id: impl fmt::Display) -> Self {
        Self::AlreadyExists {
            entity,
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`RepositoryError::VersionConflict`].
    #[must_use]
    pub fn version_conflict(
        entity: &'static str,
        id: impl fmt::Display,
        expected: u64,
        stored: u64,
    ) -> Self {
        Self::VersionConflict {
            entity,
            id: id.to_string(),
            expected,
            stored,
        }
    }

    /// Returns true if retrying the whole read-modify-write cycle can
    /// succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage for RFQ aggregates.
#[async_trait]
pub trait RfqRepository: Send + Sync + fmt::Debug {
    /// Inserts a new aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::AlreadyExists`] if the id is taken.
    async fn insert(&self, rfq: &Rfq) -> RepositoryResult<()>;

    /// Fetches an aggregate by id.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] on backend failure.
    async fn get(&self, id: RfqId) -> RepositoryResult<Option<Rfq>>;

    /// Replaces an aggregate if and only if the stored version still equals
    /// `expected_version` (the version the caller read, before its own
    /// mutation bumped it).
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::VersionConflict`] when the stored version
    /// moved, [`RepositoryError::NotFound`] when the aggregate vanished.
    async fn update(&self, rfq: &Rfq, expected_version: u64) -> RepositoryResult<()>;

    /// Looks up an aggregate by its tenant-scoped number.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] on backend failure.
    async fn find_by_number(
        &self,
        tenant_id: &TenantId,
        number: &RfqNumber,
    ) -> RepositoryResult<Option<Rfq>>;

    /// Lists a tenant's aggregates.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] on backend failure.
    async fn find_by_tenant(&self, tenant_id: &TenantId) -> RepositoryResult<Vec<Rfq>>;

    /// Total number of stored aggregates.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] on backend failure.
    async fn count(&self) -> RepositoryResult<u64>;
}
