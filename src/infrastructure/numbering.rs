//! # RFQ Number Generation
//!
//! Allocates human-readable RFQ numbers of the form `PREFIX-YYMM-NNNNN`.
//!
//! The sequence is an atomic counter per tenant per month: the generator
//! reserves the next value under a lock, so two concurrent creations can
//! never observe the same count. Counting existing rows and formatting
//! `count + 1` is exactly the race this trait exists to rule out.

use crate::domain::value_objects::ids::TenantId;
use crate::domain::value_objects::rfq_number::{RfqNumber, RfqNumberError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors from number allocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberingError {
    /// The per-tenant-per-month sequence ran out.
    #[error("sequence exhausted for tenant {tenant_id} in {yymm}")]
    SequenceExhausted {
        /// Tenant whose counter overflowed.
        tenant_id: TenantId,
        /// Month bucket.
        yymm: String,
    },

    /// The generated parts did not form a valid number.
    #[error(transparent)]
    Invalid(#[from] RfqNumberError),

    /// Backend failure.
    #[error("numbering backend error: {0}")]
    Backend(String),
}

/// Allocates the next RFQ number for a tenant and month bucket.
#[async_trait]
pub trait RfqNumberGenerator: Send + Sync + fmt::Debug {
    /// Reserves and returns the next number.
    ///
    /// Each call consumes one sequence value; values are never reused even
    /// if the caller's creation later fails.
    ///
    /// # Errors
    ///
    /// Returns a [`NumberingError`] when the sequence is exhausted or the
    /// backend fails.
    async fn next_number(
        &self,
        tenant_id: &TenantId,
        prefix: &str,
        yymm: &str,
    ) -> Result<RfqNumber, NumberingError>;
}

/// In-memory [`RfqNumberGenerator`] backed by a per-tenant-per-month
/// counter map.
///
/// # Examples
///
/// ```
/// use rfq_engine::domain::value_objects::TenantId;
/// use rfq_engine::infrastructure::numbering::{InMemoryNumberGenerator, RfqNumberGenerator};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let generator = InMemoryNumberGenerator::new();
/// let tenant = TenantId::new("acme");
/// let first = generator.next_number(&tenant, "RFQ", "2608").await.unwrap();
/// let second = generator.next_number(&tenant, "RFQ", "2608").await.unwrap();
/// assert_eq!(first.to_string(), "RFQ-2608-00001");
/// assert_eq!(second.to_string(), "RFQ-2608-00002");
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryNumberGenerator {
    counters: Arc<Mutex<HashMap<(TenantId, String), u32>>>,
}

impl InMemoryNumberGenerator {
    /// Creates a generator with all sequences at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RfqNumberGenerator for InMemoryNumberGenerator {
    async fn next_number(
        &self,
        tenant_id: &TenantId,
        prefix: &str,
        yymm: &str,
    ) -> Result<RfqNumber, NumberingError> {
        let mut counters = self.counters.lock().await;
        let key = (tenant_id.clone(), yymm.to_owned());
        let current = counters.get(&key).copied().unwrap_or(0);
        if current >= RfqNumber::MAX_SEQUENCE {
            return Err(NumberingError::SequenceExhausted {
                tenant_id: tenant_id.clone(),
                yymm: yymm.to_owned(),
            });
        }
        let next = current + 1;
        let number = RfqNumber::format(prefix, yymm, next)?;
        counters.insert(key, next);
        Ok(number)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sequences_are_per_tenant() {
        let generator = InMemoryNumberGenerator::new();
        let acme = TenantId::new("acme");
        let globex = TenantId::new("globex");

        let a1 = generator.next_number(&acme, "RFQ", "2608").await.unwrap();
        let g1 = generator.next_number(&globex, "RFQ", "2608").await.unwrap();
        assert_eq!(a1.sequence(), 1);
        assert_eq!(g1.sequence(), 1);
    }

    #[tokio::test]
    async fn sequences_are_per_month() {
        let generator = InMemoryNumberGenerator::new();
        let tenant = TenantId::new("acme");

        generator.next_number(&tenant, "RFQ", "2608").await.unwrap();
        let sept = generator.next_number(&tenant, "RFQ", "2609").await.unwrap();
        assert_eq!(sept.sequence(), 1);
    }

    #[tokio::test]
    async fn concurrent_allocations_never_collide() {
        let generator = InMemoryNumberGenerator::new();
        let tenant = TenantId::new("acme");

        let mut handles = Vec::new();
        for _ in 0..50 {
            let generator = generator.clone();
            let tenant = tenant.clone();
            handles.push(tokio::spawn(async move {
                generator.next_number(&tenant, "RFQ", "2608").await.unwrap()
            }));
        }
        let mut sequences = Vec::new();
        for handle in handles {
            sequences.push(handle.await.unwrap().sequence());
        }
        sequences.sort_unstable();
        sequences.dedup();
        assert_eq!(sequences.len(), 50);
    }
}
