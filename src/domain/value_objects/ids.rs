//! # Identity Value Objects
//!
//! Type-safe identity wrappers for domain identifiers.
//!
//! This module provides newtype wrappers for all domain identifiers,
//! ensuring type safety and preventing accidental mixing of different ID types.
//!
//! ## UUID-based Identifiers
//!
//! - [`RfqId`] - Request-for-Quote identifier (internal opaque id)
//! - [`QuoteId`] - Quote identifier
//! - [`EventId`] - Activity-log entry identifier
//!
//! ## String-based Identifiers
//!
//! - [`TenantId`] - Tenant scope for numbering and isolation
//! - [`SupplierId`] - Supplier company identifier
//! - [`BuyerId`] - Buyer company identifier

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates an identifier from an existing UUID.
            #[inline]
            #[must_use]
            pub const fn new(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Generates a new random identifier using UUID v4.
            #[must_use]
            pub fn new_v4() -> Self {
                Self(Uuid::new_v4())
            }

            /// Returns the inner UUID value.
            #[inline]
            #[must_use]
            pub const fn get(self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.hyphenated())
            }
        }

        impl From<Uuid> for $name {
            #[inline]
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier from a string.
            #[inline]
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the identifier and returns the inner String.
            #[inline]
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            #[inline]
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            #[inline]
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

uuid_id! {
    /// Request-for-Quote identifier.
    ///
    /// The internal opaque id of an RFQ aggregate. The human-readable,
    /// tenant-scoped [`RfqNumber`](super::rfq_number::RfqNumber) is a
    /// separate concept generated once on first persist.
    ///
    /// # Examples
    ///
    /// ```
    /// use rfq_engine::domain::value_objects::ids::RfqId;
    ///
    /// let rfq_id = RfqId::new_v4();
    /// println!("RFQ: {}", rfq_id);
    /// ```
    RfqId
}

uuid_id! {
    /// Quote identifier.
    ///
    /// Uniquely identifies a supplier quote within an RFQ. Revisions get a
    /// fresh id; the superseded quote keeps its own.
    QuoteId
}

uuid_id! {
    /// Activity-log entry identifier.
    ///
    /// Uniquely identifies one append-only audit entry.
    EventId
}

string_id! {
    /// Tenant identifier.
    ///
    /// Scopes RFQ numbering and data isolation. Sequential numbers are
    /// unique per tenant per month.
    ///
    /// # Examples
    ///
    /// ```
    /// use rfq_engine::domain::value_objects::ids::TenantId;
    ///
    /// let tenant = TenantId::new("acme-industrial");
    /// assert_eq!(tenant.as_str(), "acme-industrial");
    /// ```
    TenantId
}

string_id! {
    /// Supplier company identifier.
    ///
    /// Identifies the company a quote belongs to. Also the deterministic
    /// final tie-breaker in quote ranking.
    SupplierId
}

string_id! {
    /// Buyer company identifier.
    ///
    /// Identifies the company that owns an RFQ.
    BuyerId
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod rfq_id {
        use super::*;

        #[test]
        fn new_v4_generates_unique_ids() {
            let id1 = RfqId::new_v4();
            let id2 = RfqId::new_v4();
            assert_ne!(id1, id2);
        }

        #[test]
        fn from_uuid_roundtrip() {
            let uuid = Uuid::new_v4();
            let rfq_id = RfqId::new(uuid);
            assert_eq!(rfq_id.get(), uuid);
        }

        #[test]
        fn display_formats_as_hyphenated() {
            let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
            let rfq_id = RfqId::new(uuid);
            assert_eq!(rfq_id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
        }

        #[test]
        fn serde_roundtrip() {
            let rfq_id = RfqId::new_v4();
            let json = serde_json::to_string(&rfq_id).unwrap();
            let back: RfqId = serde_json::from_str(&json).unwrap();
            assert_eq!(rfq_id, back);
        }
    }

    mod quote_id {
        use super::*;

        #[test]
        fn new_v4_generates_unique_ids() {
            assert_ne!(QuoteId::new_v4(), QuoteId::new_v4());
        }

        #[test]
        fn serde_roundtrip() {
            let quote_id = QuoteId::new_v4();
            let json = serde_json::to_string(&quote_id).unwrap();
            let back: QuoteId = serde_json::from_str(&json).unwrap();
            assert_eq!(quote_id, back);
        }
    }

    mod supplier_id {
        use super::*;

        #[test]
        fn new_from_str() {
            let id = SupplierId::new("supplier-001");
            assert_eq!(id.as_str(), "supplier-001");
        }

        #[test]
        fn ordering_is_lexicographic() {
            // The ranking tie-breaker relies on a total order.
            let a = SupplierId::new("alpha");
            let b = SupplierId::new("beta");
            assert!(a < b);
        }

        #[test]
        fn into_inner() {
            let id = SupplierId::new("supplier-001");
            assert_eq!(id.into_inner(), "supplier-001");
        }

        #[test]
        fn hash_equality() {
            use std::collections::HashSet;
            let mut set = HashSet::new();
            set.insert(SupplierId::new("dup"));
            assert!(set.contains(&SupplierId::new("dup")));
        }
    }

    mod tenant_id {
        use super::*;

        #[test]
        fn display_formats_correctly() {
            let tenant = TenantId::new("acme");
            assert_eq!(tenant.to_string(), "acme");
        }

        #[test]
        fn serde_roundtrip() {
            let tenant = TenantId::new("acme");
            let json = serde_json::to_string(&tenant).unwrap();
            let back: TenantId = serde_json::from_str(&json).unwrap();
            assert_eq!(tenant, back);
        }
    }
}
