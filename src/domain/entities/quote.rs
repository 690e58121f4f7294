//! # Quote Entity
//!
//! A supplier's priced, time-bounded response to an RFQ.
//!
//! A quote belongs to exactly one RFQ and one supplier. It is created on
//! submission, superseded (never deleted) on revision, and finalized
//! (accepted or rejected) only as part of an award. `score` and `ranking`
//! are computed by the evaluation engine and are never user-supplied.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::ids::{QuoteId, SupplierId};
use crate::domain::value_objects::money::Money;
use crate::domain::value_objects::quote_status::QuoteStatus;
use crate::domain::value_objects::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One priced line of a quote, referencing an RFQ item by index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteLineItem {
    /// Index into the RFQ's ordered item-requirement list.
    pub item_index: usize,
    /// Unit price offered.
    pub unit_price: Money,
    /// Quantity offered (>= 1).
    pub quantity: u32,
    /// Lead time in days.
    pub lead_time_days: u32,
    /// Free-form supplier notes for this line.
    pub notes: Option<String>,
}

impl QuoteLineItem {
    /// Validates this line against the RFQ's item count.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidLineItem`] naming the first violated
    /// rule: unknown item index, or zero quantity.
    pub fn validate(&self, rfq_item_count: usize) -> DomainResult<()> {
        if self.item_index >= rfq_item_count {
            return Err(DomainError::InvalidLineItem(format!(
                "item index {} does not reference an rfq item (rfq has {})",
                self.item_index, rfq_item_count
            )));
        }
        if self.quantity == 0 {
            return Err(DomainError::InvalidLineItem(format!(
                "quantity must be at least 1 for item index {}",
                self.item_index
            )));
        }
        Ok(())
    }
}

/// A supplier quote embedded in an RFQ aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    id: QuoteId,
    supplier_id: SupplierId,
    status: QuoteStatus,
    total_amount: Money,
    valid_until: Timestamp,
    line_items: Vec<QuoteLineItem>,
    submitted_at: Timestamp,
    score: Option<f64>,
    ranking: Option<u32>,
}

impl Quote {
    /// Creates a freshly submitted quote.
    #[must_use]
    pub fn submitted(
        supplier_id: SupplierId,
        total_amount: Money,
        valid_until: Timestamp,
        line_items: Vec<QuoteLineItem>,
        submitted_at: Timestamp,
    ) -> Self {
        Self {
            id: QuoteId::new_v4(),
            supplier_id,
            status: QuoteStatus::Submitted,
            total_amount,
            valid_until,
            line_items,
            submitted_at,
            score: None,
            ranking: None,
        }
    }

    /// Creates a revision replacing an earlier quote.
    ///
    /// The revision competes with status [`QuoteStatus::Revised`]; marking
    /// the prior quote withdrawn is the aggregate's responsibility within
    /// the same atomic write.
    #[must_use]
    pub fn revision(
        supplier_id: SupplierId,
        total_amount: Money,
        valid_until: Timestamp,
        line_items: Vec<QuoteLineItem>,
        submitted_at: Timestamp,
    ) -> Self {
        Self {
            status: QuoteStatus::Revised,
            ..Self::submitted(
                supplier_id,
                total_amount,
                valid_until,
                line_items,
                submitted_at,
            )
        }
    }

    /// Quote identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> QuoteId {
        self.id
    }

    /// Owning supplier.
    #[inline]
    #[must_use]
    pub const fn supplier_id(&self) -> &SupplierId {
        &self.supplier_id
    }

    /// Current status.
    #[inline]
    #[must_use]
    pub const fn status(&self) -> QuoteStatus {
        self.status
    }

    /// Quoted total.
    #[inline]
    #[must_use]
    pub const fn total_amount(&self) -> &Money {
        &self.total_amount
    }

    /// Quote validity deadline.
    #[inline]
    #[must_use]
    pub const fn valid_until(&self) -> Timestamp {
        self.valid_until
    }

    /// Ordered line items.
    #[must_use]
    pub fn line_items(&self) -> &[QuoteLineItem] {
        &self.line_items
    }

    /// When the quote (or this revision) was submitted.
    #[inline]
    #[must_use]
    pub const fn submitted_at(&self) -> Timestamp {
        self.submitted_at
    }

    /// Display score from the latest evaluation, rounded to 2 decimals.
    #[inline]
    #[must_use]
    pub const fn score(&self) -> Option<f64> {
        self.score
    }

    /// Rank from the latest evaluation (1 = best).
    #[inline]
    #[must_use]
    pub const fn ranking(&self) -> Option<u32> {
        self.ranking
    }

    /// Returns true if this quote is competing (submitted or revised).
    #[inline]
    #[must_use]
    pub const fn is_competing(&self) -> bool {
        self.status.is_competing()
    }

    /// Records an evaluation result.
    ///
    /// The stored score is rounded to 2 decimals for display; the ranking
    /// was computed on the unrounded value by the evaluation engine.
    pub fn record_evaluation(&mut self, score: f64, ranking: u32) {
        self.score = Some((score * 100.0).round() / 100.0);
        self.ranking = Some(ranking);
    }

    /// Marks the quote withdrawn (supplier action or supersession).
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::QuoteNotActive`] unless the quote is currently
    /// competing.
    pub fn withdraw(&mut self) -> DomainResult<()> {
        if !self.status.is_competing() {
            return Err(DomainError::QuoteNotActive(format!(
                "quote {} is {} and cannot be withdrawn",
                self.id, self.status
            )));
        }
        self.status = QuoteStatus::Withdrawn;
        Ok(())
    }

    /// Marks the quote accepted as part of an award.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::QuoteNotActive`] unless the quote is currently
    /// competing.
    pub fn accept(&mut self) -> DomainResult<()> {
        if !self.status.is_competing() {
            return Err(DomainError::QuoteNotActive(format!(
                "quote {} is {} and cannot be accepted",
                self.id, self.status
            )));
        }
        self.status = QuoteStatus::Accepted;
        Ok(())
    }

    /// Marks the quote rejected as part of an award.
    pub fn reject(&mut self) {
        if self.status.is_competing() {
            self.status = QuoteStatus::Rejected;
        }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Quote({} {} {} {})",
            self.id, self.supplier_id, self.status, self.total_amount
        )
    }
}
