//! # Application DTOs
//!
//! Data transfer objects for the service facade.
//!
//! Requests carry untrusted input and validate shape before any domain
//! object is built; responses are slim views over aggregate state so
//! callers never hold a live aggregate.

use crate::domain::entities::quote::QuoteLineItem;
use crate::domain::entities::rfq::{ItemRequirement, Rfq};
use crate::domain::events::ActivityEntry;
use crate::domain::value_objects::criteria::SelectionCriteria;
use crate::domain::value_objects::ids::{QuoteId, RfqId, SupplierId};
use crate::domain::value_objects::money::Money;
use crate::domain::value_objects::rfq_number::RfqNumber;
use crate::domain::value_objects::rfq_status::RfqStatus;
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::visibility::Visibility;
use serde::{Deserialize, Serialize};

/// Request to create a new draft RFQ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRfqRequest {
    /// RFQ title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Procurement category.
    #[serde(default)]
    pub category: String,
    /// Item requirements (at least one).
    pub items: Vec<ItemRequirement>,
    /// Delivery location.
    #[serde(default)]
    pub delivery_location: String,
    /// Delivery terms, if agreed.
    #[serde(default)]
    pub delivery_terms: Option<String>,
    /// Selection-criteria weights; defaults to the standard split.
    #[serde(default)]
    pub criteria: SelectionCriteria,
    /// Quoting deadline; defaults from configuration when absent.
    #[serde(default)]
    pub due_date: Option<Timestamp>,
    /// End of quote validity; defaults from configuration when absent.
    #[serde(default)]
    pub valid_until: Option<Timestamp>,
    /// Visibility rule.
    #[serde(default)]
    pub visibility: Visibility,
    /// Invitation list (meaningful when visibility is `Invited`).
    #[serde(default)]
    pub invited_suppliers: Vec<SupplierId>,
    /// Exclusion list.
    #[serde(default)]
    pub excluded_suppliers: Vec<SupplierId>,
}

impl CreateRfqRequest {
    /// Validates request shape before touching the domain.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first violated rule.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title cannot be empty".to_owned());
        }
        if self.items.is_empty() {
            return Err("at least one item is required".to_owned());
        }
        if let (Some(due), Some(valid_until)) = (self.due_date, self.valid_until) {
            if due.is_after(valid_until) {
                return Err("valid_until cannot precede due_date".to_owned());
            }
        }
        Ok(())
    }
}

/// A supplier's quote payload for submission or revision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteSubmission {
    /// Quoted total.
    pub total_amount: Money,
    /// How long the quote stays valid.
    pub valid_until: Timestamp,
    /// Priced lines referencing RFQ items by index.
    pub line_items: Vec<QuoteLineItem>,
}

impl QuoteSubmission {
    /// Validates submission shape before touching the domain.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first violated rule.
    pub fn validate(&self) -> Result<(), String> {
        if self.line_items.is_empty() {
            return Err("at least one line item is required".to_owned());
        }
        Ok(())
    }
}

/// Slim view of an RFQ returned by read operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfqView {
    /// Internal id.
    pub id: RfqId,
    /// Human-readable number.
    pub number: RfqNumber,
    /// Title.
    pub title: String,
    /// Lifecycle status (after lazy expiry).
    pub status: RfqStatus,
    /// Quoting deadline.
    pub due_date: Timestamp,
    /// End of quote validity.
    pub valid_until: Timestamp,
    /// Current aggregate version.
    pub version: u64,
    /// Number of competing quotes.
    pub competing_quotes: usize,
    /// Winning supplier, once awarded.
    pub awarded_to: Option<SupplierId>,
}

impl From<&Rfq> for RfqView {
    fn from(rfq: &Rfq) -> Self {
        Self {
            id: rfq.id(),
            number: rfq.number().clone(),
            title: rfq.title().to_owned(),
            status: rfq.status(),
            due_date: rfq.due_date(),
            valid_until: rfq.valid_until(),
            version: rfq.version(),
            competing_quotes: rfq.competing_quotes().count(),
            awarded_to: rfq.awarded_to().cloned(),
        }
    }
}

/// Receipt returned by every mutating operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationReceipt {
    /// The affected RFQ.
    pub rfq_id: RfqId,
    /// Aggregate version after the write.
    pub version: u64,
    /// Status after the write.
    pub status: RfqStatus,
    /// The quote created or touched, when the operation concerned one.
    pub quote_id: Option<QuoteId>,
    /// The audit-trail entry the operation appended; callers forward it to
    /// notification collaborators.
    pub entry: ActivityEntry,
}
