//! # Domain Errors
//!
//! Typed domain error definitions.
//!
//! This module provides the [`DomainError`] enum for representing
//! domain-level errors with numeric error codes.
//!
//! # Error Code Ranges
//!
//! - **1000-1999**: Validation errors (malformed input, rejected before any mutation)
//! - **2000-2999**: State errors (operation invalid for the current status)
//! - **3000-3999**: Eligibility errors (supplier not permitted to submit)
//! - **4000-4999**: Monetary/arithmetic errors
//!
//! # Examples
//!
//! ```
//! use rfq_engine::domain::errors::DomainError;
//!
//! let error = DomainError::InvalidTimeline("due date must be after issue date".to_string());
//! assert_eq!(error.code(), 1002);
//! assert_eq!(error.category(), "validation");
//! ```

use crate::domain::errors::eligibility_error::EligibilityError;
use crate::domain::value_objects::criteria::InvalidWeightsError;
use crate::domain::value_objects::money::MoneyError;
use crate::domain::value_objects::rfq_number::RfqNumberError;
use crate::domain::value_objects::rfq_status::RfqStatus;
use thiserror::Error;

/// Domain-level error with numeric error codes.
///
/// Provides typed errors for domain operations with consistent error codes
/// for logging and API responses. A rejected operation always leaves the
/// aggregate untouched; the message names the first rule violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (1000-1999)
    // ========================================================================
    /// Selection-criteria weights do not sum to 100.
    #[error("invalid selection criteria: {0}")]
    InvalidWeights(#[from] InvalidWeightsError),

    /// Timeline ordering violated (`issued < due <= valid_until`).
    #[error("invalid timeline: {0}")]
    InvalidTimeline(String),

    /// A quote line item failed validation (unknown item index, bad
    /// quantity/price/lead time).
    #[error("invalid line item: {0}")]
    InvalidLineItem(String),

    /// RFQ number could not be formed or parsed.
    #[error("invalid rfq number: {0}")]
    InvalidNumber(#[from] RfqNumberError),

    /// A required field was missing or empty.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// Generic validation error.
    #[error("validation error: {0}")]
    Validation(String),

    // ========================================================================
    // State Errors (2000-2999)
    // ========================================================================
    /// Invalid lifecycle transition attempted.
    #[error("invalid status transition from {from} to {to}")]
    InvalidStatusTransition {
        /// The current status.
        from: RfqStatus,
        /// The attempted target status.
        to: RfqStatus,
    },

    /// Quote not found within the aggregate.
    #[error("quote not found: {0}")]
    QuoteNotFound(String),

    /// Quote exists but is not in a status the operation accepts.
    #[error("quote not active: {0}")]
    QuoteNotActive(String),

    /// Deadline extension was not strictly forward in time.
    #[error("new due date {requested} is not after current due date {current}")]
    DeadlineNotForward {
        /// The current due date (RFC 3339).
        current: String,
        /// The requested due date (RFC 3339).
        requested: String,
    },

    /// Operation not allowed in the current status.
    #[error("operation not allowed: {0}")]
    OperationNotAllowed(String),

    // ========================================================================
    // Eligibility Errors (3000-3999)
    // ========================================================================
    /// The eligibility gate vetoed the submission.
    #[error(transparent)]
    Eligibility(#[from] EligibilityError),

    // ========================================================================
    // Monetary Errors (4000-4999)
    // ========================================================================
    /// Monetary amount was invalid or arithmetic failed.
    #[error("money error: {0}")]
    Money(#[from] MoneyError),
}

impl DomainError {
    /// Returns the numeric error code.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            // Validation errors (1000-1999)
            Self::InvalidWeights(_) => 1001,
            Self::InvalidTimeline(_) => 1002,
            Self::InvalidLineItem(_) => 1003,
            Self::InvalidNumber(_) => 1004,
            Self::MissingField(_) => 1005,
            Self::Validation(_) => 1099,

            // State errors (2000-2999)
            Self::InvalidStatusTransition { .. } => 2001,
            Self::QuoteNotFound(_) => 2002,
            Self::QuoteNotActive(_) => 2003,
            Self::DeadlineNotForward { .. } => 2004,
            Self::OperationNotAllowed(_) => 2099,

            // Eligibility errors (3000-3999)
            Self::Eligibility(e) => e.code(),

            // Monetary errors (4000-4999)
            Self::Money(_) => 4001,
        }
    }

    /// Returns the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.code() {
            1000..=1999 => "validation",
            2000..=2999 => "state",
            3000..=3999 => "eligibility",
            4000..=4999 => "money",
            _ => "unknown",
        }
    }

    /// Returns true if this is a validation error.
    #[inline]
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self.code(), 1000..=1999)
    }

    /// Returns true if this is a state error.
    #[inline]
    #[must_use]
    pub const fn is_state_error(&self) -> bool {
        matches!(self.code(), 2000..=2999)
    }

    /// Returns true if this is an eligibility error.
    #[inline]
    #[must_use]
    pub const fn is_eligibility_error(&self) -> bool {
        matches!(self.code(), 3000..=3999)
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
