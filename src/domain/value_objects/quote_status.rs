//! # Quote Status
//!
//! Lifecycle status of a supplier quote.
//!
//! A quote is created on submission, superseded (never deleted) on revision,
//! and finalized (accepted or rejected) only as part of an award. The
//! "active" statuses are the ones that count toward the one-active-quote-per-
//! supplier invariant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteStatus {
    /// Drafted but not yet submitted.
    #[default]
    Pending,

    /// Submitted and competing.
    Submitted,

    /// A revision of an earlier quote, competing in its place.
    Revised,

    /// Selected as the winner during an award.
    Accepted,

    /// Passed over during an award.
    Rejected,

    /// Withdrawn by the supplier, or superseded by a revision.
    Withdrawn,
}

impl QuoteStatus {
    /// Returns true if the quote is active.
    ///
    /// At most one quote per (RFQ, supplier) may be in an active status at
    /// any instant.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Submitted | Self::Revised | Self::Accepted)
    }

    /// Returns true if the quote is competing and therefore eligible for
    /// evaluation and award.
    #[inline]
    #[must_use]
    pub const fn is_competing(&self) -> bool {
        matches!(self, Self::Submitted | Self::Revised)
    }

    /// Returns true if the quote counts against a resubmission.
    ///
    /// A supplier with a non-withdrawn, non-rejected quote on file cannot
    /// submit another one; they must revise instead.
    #[inline]
    #[must_use]
    pub const fn blocks_resubmission(&self) -> bool {
        !matches!(self, Self::Withdrawn | Self::Rejected)
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Submitted => "SUBMITTED",
            Self::Revised => "REVISED",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Withdrawn => "WITHDRAWN",
        };
        write!(f, "{}", s)
    }
}
