//! # RFQ Status
//!
//! RFQ lifecycle state machine.
//!
//! This module provides the [`RfqStatus`] enum representing the lifecycle
//! of a Request for Quote with enforced state transitions.
//!
//! # State Machine
//!
//! ```text
//! Draft ──publish──> Published ──award──> Awarded
//!   │                   │  │
//!   │                   │  ├──close──> Closed ──cancel──> Cancelled
//!   │                   │  └──deadline lapsed (lazy)──> Expired
//!   └──────cancel───────┴──────────────────────────────> Cancelled
//! ```
//!
//! Expiry is applied lazily: a `Published` RFQ read or written after its
//! due date becomes `Expired` at that moment, not by a background job.
//!
//! # Examples
//!
//! ```
//! use rfq_engine::domain::value_objects::rfq_status::RfqStatus;
//!
//! let status = RfqStatus::Draft;
//! assert!(status.can_transition_to(RfqStatus::Published));
//! assert!(!status.can_transition_to(RfqStatus::Awarded));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// RFQ lifecycle status.
///
/// State transitions are enforced via
/// [`can_transition_to`](RfqStatus::can_transition_to).
///
/// # Terminal States
///
/// The following states are terminal (no further transitions allowed):
/// - [`Awarded`](RfqStatus::Awarded) - A winning quote was accepted
/// - [`Cancelled`](RfqStatus::Cancelled) - Withdrawn by the buyer
/// - [`Expired`](RfqStatus::Expired) - Due date lapsed without an award
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RfqStatus {
    /// Created by a buyer, not yet visible to suppliers.
    #[default]
    Draft,

    /// Open for quoting per the RFQ's visibility rules.
    Published,

    /// Quoting ended early by the buyer without an award.
    Closed,

    /// A winning quote was accepted (terminal).
    Awarded,

    /// Withdrawn by the buyer (terminal).
    Cancelled,

    /// Due date lapsed while published (terminal, applied lazily).
    Expired,
}

impl RfqStatus {
    /// Returns true if this is a terminal status.
    ///
    /// Terminal statuses cannot transition to any other status.
    ///
    /// # Examples
    ///
    /// ```
    /// use rfq_engine::domain::value_objects::rfq_status::RfqStatus;
    ///
    /// assert!(!RfqStatus::Draft.is_terminal());
    /// assert!(RfqStatus::Awarded.is_terminal());
    /// assert!(RfqStatus::Cancelled.is_terminal());
    /// assert!(RfqStatus::Expired.is_terminal());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Awarded | Self::Cancelled | Self::Expired)
    }

    /// Returns true if this status can transition to the target status.
    ///
    /// Enforces the RFQ state machine rules:
    /// - Draft → Published, Cancelled
    /// - Published → Awarded, Cancelled, Closed, Expired
    /// - Closed → Cancelled
    /// - Terminal statuses → (none)
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::Published)
                | (Self::Draft, Self::Cancelled)
                | (Self::Published, Self::Awarded)
                | (Self::Published, Self::Cancelled)
                | (Self::Published, Self::Closed)
                | (Self::Published, Self::Expired)
                | (Self::Closed, Self::Cancelled)
        )
    }

    /// Returns the valid next statuses from this status.
    #[must_use]
    pub fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Self::Draft => vec![Self::Published, Self::Cancelled],
            Self::Published => vec![Self::Awarded, Self::Cancelled, Self::Closed, Self::Expired],
            Self::Closed => vec![Self::Cancelled],
            Self::Awarded | Self::Cancelled | Self::Expired => vec![],
        }
    }

    /// Returns true if quotes may be admitted in this status.
    ///
    /// Quoting is only open while `Published`; the due-date check is a
    /// separate, time-dependent veto applied by the eligibility gate.
    #[inline]
    #[must_use]
    pub const fn accepts_quotes(&self) -> bool {
        matches!(self, Self::Published)
    }
}

impl fmt::Display for RfqStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Draft => "DRAFT",
            Self::Published => "PUBLISHED",
            Self::Closed => "CLOSED",
            Self::Awarded => "AWARDED",
            Self::Cancelled => "CANCELLED",
            Self::Expired => "EXPIRED",
        };
        write!(f, "{}", s)
    }
}
