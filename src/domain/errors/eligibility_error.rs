//! # Eligibility Errors
//!
//! The ordered veto reasons produced by the eligibility gate.
//!
//! Each variant names the *first* rule that vetoed a submission, in the
//! order the gate evaluates them, so the caller can explain the rejection
//! to the supplier.

use thiserror::Error;

/// Reason a supplier may not (re)submit a quote right now.
///
/// Variants are listed in gate evaluation order; the gate reports the first
/// failure and stops.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EligibilityError {
    /// The RFQ is not open for quoting (not published, or past its due date).
    #[error("rfq is not active: {0}")]
    RfqNotActive(String),

    /// The RFQ's visibility rules deny this supplier (private RFQ, or an
    /// invited RFQ the supplier was not invited to).
    #[error("visibility denied: {0}")]
    VisibilityDenied(String),

    /// The supplier is on the RFQ's exclusion list.
    #[error("supplier excluded: {0}")]
    SupplierExcluded(String),

    /// The supplier already has a non-withdrawn, non-rejected quote on file.
    #[error("duplicate quote: {0}")]
    DuplicateQuote(String),
}

impl EligibilityError {
    /// Returns the numeric error code (3000-3999 range).
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::RfqNotActive(_) => 3001,
            Self::VisibilityDenied(_) => 3002,
            Self::SupplierExcluded(_) => 3003,
            Self::DuplicateQuote(_) => 3004,
        }
    }
}
