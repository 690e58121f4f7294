//! # Activity Entries
//!
//! Typed audit-trail entries for the RFQ lifecycle.

use crate::domain::value_objects::ids::{EventId, QuoteId, SupplierId};
use crate::domain::value_objects::money::Money;
use crate::domain::value_objects::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of auditable lifecycle actions, each with a typed payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActivityKind {
    /// RFQ was created in draft.
    RfqCreated,

    /// RFQ was published and opened for quoting.
    RfqPublished,

    /// A supplier submitted a new quote.
    QuoteSubmitted {
        /// The new quote.
        quote_id: QuoteId,
    },

    /// A supplier revised an existing quote; the prior one was superseded.
    QuoteRevised {
        /// The replacement quote.
        quote_id: QuoteId,
        /// The quote that was marked withdrawn in the same write.
        superseded: QuoteId,
    },

    /// A supplier withdrew a quote.
    QuoteWithdrawn {
        /// The withdrawn quote.
        quote_id: QuoteId,
    },

    /// An evaluation run was persisted onto the competing quotes.
    QuotesEvaluated {
        /// Number of quotes that received a score and rank.
        evaluated: usize,
    },

    /// The buyer awarded the RFQ to a supplier.
    RfqAwarded {
        /// The winning quote.
        quote_id: QuoteId,
        /// The winning supplier.
        supplier_id: SupplierId,
        /// The awarded total.
        amount: Money,
    },

    /// The buyer cancelled the RFQ.
    RfqCancelled {
        /// Buyer-supplied reason.
        reason: String,
    },

    /// The buyer closed quoting early without an award.
    RfqClosed,

    /// The quoting deadline was extended.
    DeadlineExtended {
        /// Previous due date.
        old_date: Timestamp,
        /// New due date.
        new_date: Timestamp,
    },

    /// The RFQ lapsed past its due date (applied lazily).
    RfqExpired,
}

impl ActivityKind {
    /// Returns the action name used in serialized form.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::RfqCreated => "rfq_created",
            Self::RfqPublished => "rfq_published",
            Self::QuoteSubmitted { .. } => "quote_submitted",
            Self::QuoteRevised { .. } => "quote_revised",
            Self::QuoteWithdrawn { .. } => "quote_withdrawn",
            Self::QuotesEvaluated { .. } => "quotes_evaluated",
            Self::RfqAwarded { .. } => "rfq_awarded",
            Self::RfqCancelled { .. } => "rfq_cancelled",
            Self::RfqClosed => "rfq_closed",
            Self::DeadlineExtended { .. } => "deadline_extended",
            Self::RfqExpired => "rfq_expired",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.action())
    }
}

/// One append-only audit-trail entry.
///
/// Entries are ordered by position in the aggregate's activity log; `at`
/// records when the action happened and `actor` who performed it (a caller
/// id, or `system` for lazy expiry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Unique entry id.
    pub id: EventId,
    /// When the action happened.
    pub at: Timestamp,
    /// Who performed the action.
    pub actor: String,
    /// What happened, with its typed payload.
    pub kind: ActivityKind,
}

impl ActivityEntry {
    /// Creates a new entry stamped with a fresh [`EventId`].
    #[must_use]
    pub fn new(at: Timestamp, actor: impl Into<String>, kind: ActivityKind) -> Self {
        Self {
            id: EventId::new_v4(),
            at,
            actor: actor.into(),
            kind,
        }
    }
}

impl fmt::Display for ActivityEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {} at {}", self.kind, self.actor, self.at)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn entries_get_unique_ids() {
        let now = Timestamp::now();
        let a = ActivityEntry::new(now, "buyer-1", ActivityKind::RfqCreated);
        let b = ActivityEntry::new(now, "buyer-1", ActivityKind::RfqCreated);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn serialized_form_is_tagged_by_action() {
        let kind = ActivityKind::QuoteSubmitted {
            quote_id: QuoteId::new_v4(),
        };
        let json = serde_json::to_string(&kind).unwrap();
        assert!(json.contains("\"action\":\"quote_submitted\""));
        assert!(json.contains("quote_id"));
    }

    #[test]
    fn award_payload_carries_amount() {
        let kind = ActivityKind::RfqAwarded {
            quote_id: QuoteId::new_v4(),
            supplier_id: SupplierId::new("supplier-1"),
            amount: Money::new(1500.0, "USD").unwrap(),
        };
        let json = serde_json::to_string(&kind).unwrap();
        assert!(json.contains("\"action\":\"rfq_awarded\""));
        assert!(json.contains("USD"));
    }

    #[test]
    fn action_names_match_variants() {
        assert_eq!(ActivityKind::RfqCreated.action(), "rfq_created");
        assert_eq!(
            ActivityKind::DeadlineExtended {
                old_date: Timestamp::from_unix_secs(0),
                new_date: Timestamp::from_unix_secs(1),
            }
            .action(),
            "deadline_extended"
        );
        assert_eq!(ActivityKind::RfqExpired.action(), "rfq_expired");
    }

    #[test]
    fn serde_roundtrip() {
        let entry = ActivityEntry::new(
            Timestamp::from_unix_secs(1_700_000_000),
            "system",
            ActivityKind::RfqExpired,
        );
        let json = serde_json::to_string(&entry).unwrap();
        let back: ActivityEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }
}
