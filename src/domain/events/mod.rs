//! # Activity Log
//!
//! Append-only, ordered audit trail of RFQ lifecycle events.
//!
//! Every mutating operation on an RFQ aggregate appends exactly one
//! [`ActivityEntry`] in the same atomic write, and returns that entry to the
//! caller so it can be forwarded to notification collaborators (delivery is
//! out of scope). The action set is a closed tagged enum with typed
//! payloads; extensibility comes from adding variants, not from untyped
//! metadata maps.

pub mod activity;

pub use activity::{ActivityEntry, ActivityKind};
