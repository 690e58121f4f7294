//! # Selection Criteria
//!
//! Buyer-configured weights for quote evaluation.
//!
//! This module provides [`SelectionCriteria`], the six percentage weights
//! (price, quality, delivery, payment terms, certification, sustainability)
//! that drive the composite scoring of competing quotes, and [`Criterion`],
//! the closed set of criteria the engine knows about.
//!
//! # Invariant
//!
//! The six weights MUST sum to exactly 100. The invariant is enforced on
//! construction and re-validated before every aggregate write; it is a
//! standing constraint, not a one-time check.
//!
//! # Examples
//!
//! ```
//! use rfq_engine::domain::value_objects::criteria::SelectionCriteria;
//!
//! let criteria = SelectionCriteria::new(40, 20, 15, 10, 10, 5).unwrap();
//! assert_eq!(criteria.price(), 40);
//!
//! // Weights that do not sum to 100 are rejected.
//! assert!(SelectionCriteria::new(50, 20, 15, 10, 10, 5).is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Sum every weight set must reach.
pub const WEIGHT_TOTAL: u16 = 100;

/// Error returned when the six weights do not sum to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("selection criteria weights must sum to {WEIGHT_TOTAL}, got {actual}")]
pub struct InvalidWeightsError {
    /// The sum that was actually supplied.
    pub actual: u16,
}

/// The closed set of evaluation criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    /// Quoted total amount (lower is better).
    Price,
    /// Quality signal for the supplier/quote.
    Quality,
    /// Delivery capability signal.
    Delivery,
    /// Payment terms signal.
    PaymentTerms,
    /// Certification coverage signal.
    Certification,
    /// Sustainability signal.
    Sustainability,
}

impl Criterion {
    /// All six criteria in scoring order.
    pub const ALL: [Self; 6] = [
        Self::Price,
        Self::Quality,
        Self::Delivery,
        Self::PaymentTerms,
        Self::Certification,
        Self::Sustainability,
    ];
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Price => "price",
            Self::Quality => "quality",
            Self::Delivery => "delivery",
            Self::PaymentTerms => "payment_terms",
            Self::Certification => "certification",
            Self::Sustainability => "sustainability",
        };
        write!(f, "{}", s)
    }
}

/// The six evaluation weights, guaranteed to sum to exactly 100.
///
/// Because the weights sum to 100 and every sub-score lies in [0, 100],
/// the composite score `Σ(sub_score × weight / 100)` is guaranteed to lie
/// in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionCriteria {
    price: u8,
    quality: u8,
    delivery: u8,
    payment_terms: u8,
    certification: u8,
    sustainability: u8,
}

impl SelectionCriteria {
    /// Creates a weight set, enforcing the sum-to-100 invariant.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidWeightsError`] if the six weights do not sum to
    /// exactly 100.
    pub fn new(
        price: u8,
        quality: u8,
        delivery: u8,
        payment_terms: u8,
        certification: u8,
        sustainability: u8,
    ) -> Result<Self, InvalidWeightsError> {
        let criteria = Self {
            price,
            quality,
            delivery,
            payment_terms,
            certification,
            sustainability,
        };
        criteria.validate()?;
        Ok(criteria)
    }

    /// A price-only weight set (price=100, everything else 0).
    #[must_use]
    pub const fn price_only() -> Self {
        Self {
            price: 100,
            quality: 0,
            delivery: 0,
            payment_terms: 0,
            certification: 0,
            sustainability: 0,
        }
    }

    /// Re-validates the sum-to-100 invariant.
    ///
    /// Called before every aggregate write, not only at construction:
    /// deserialized or stored state must satisfy the same constraint.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidWeightsError`] if the invariant is violated.
    pub fn validate(&self) -> Result<(), InvalidWeightsError> {
        let actual = self.total();
        if actual == WEIGHT_TOTAL {
            Ok(())
        } else {
            Err(InvalidWeightsError { actual })
        }
    }

    /// Returns the sum of all six weights.
    #[must_use]
    pub fn total(&self) -> u16 {
        u16::from(self.price)
            + u16::from(self.quality)
            + u16::from(self.delivery)
            + u16::from(self.payment_terms)
            + u16::from(self.certification)
            + u16::from(self.sustainability)
    }

    /// Returns the weight for a given criterion.
    #[must_use]
    pub const fn weight(&self, criterion: Criterion) -> u8 {
        match criterion {
            Criterion::Price => self.price,
            Criterion::Quality => self.quality,
            Criterion::Delivery => self.delivery,
            Criterion::PaymentTerms => self.payment_terms,
            Criterion::Certification => self.certification,
            Criterion::Sustainability => self.sustainability,
        }
    }

    /// Price weight.
    #[inline]
    #[must_use]
    pub const fn price(&self) -> u8 {
        self.price
    }

    /// Quality weight.
    #[inline]
    #[must_use]
    pub const fn quality(&self) -> u8 {
        self.quality
    }

    /// Delivery weight.
    #[inline]
    #[must_use]
    pub const fn delivery(&self) -> u8 {
        self.delivery
    }

    /// Payment-terms weight.
    #[inline]
    #[must_use]
    pub const fn payment_terms(&self) -> u8 {
        self.payment_terms
    }

    /// Certification weight.
    #[inline]
    #[must_use]
    pub const fn certification(&self) -> u8 {
        self.certification
    }

    /// Sustainability weight.
    #[inline]
    #[must_use]
    pub const fn sustainability(&self) -> u8 {
        self.sustainability
    }
}

impl Default for SelectionCriteria {
    /// A balanced default: price-dominant with non-zero secondary weights.
    fn default() -> Self {
        Self {
            price: 40,
            quality: 20,
            delivery: 15,
            payment_terms: 10,
            certification: 10,
            sustainability: 5,
        }
    }
}

impl fmt::Display for SelectionCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "price={} quality={} delivery={} payment_terms={} certification={} sustainability={}",
            self.price,
            self.quality,
            self.delivery,
            self.payment_terms,
            self.certification,
            self.sustainability
        )
    }
}
