//! # Timestamp Value Object
//!
//! UTC instant used across the RFQ domain.
//!
//! This module provides the [`Timestamp`] type, a thin wrapper around
//! [`chrono::DateTime<Utc>`] that fixes the time zone to UTC and exposes
//! only the operations the domain needs (ordering, offsetting, formatting
//! of the year-month pair used by RFQ numbering).
//!
//! # Examples
//!
//! ```
//! use rfq_engine::domain::value_objects::timestamp::Timestamp;
//!
//! let now = Timestamp::now();
//! let later = now.add_secs(3600);
//! assert!(later > now);
//! ```

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC instant.
///
/// All domain timestamps (issue dates, due dates, submission times, audit
/// entries) are stored as UTC; presentation-layer time zones are a caller
/// concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current instant.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from an existing UTC datetime.
    #[inline]
    #[must_use]
    pub const fn new(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    /// Creates a timestamp from Unix seconds.
    ///
    /// Out-of-range values saturate to the epoch.
    #[must_use]
    pub fn from_unix_secs(secs: i64) -> Self {
        Self(Utc.timestamp_opt(secs, 0).single().unwrap_or_default())
    }

    /// Returns the inner datetime.
    #[inline]
    #[must_use]
    pub const fn get(self) -> DateTime<Utc> {
        self.0
    }

    /// Returns a timestamp offset forward by the given number of seconds.
    #[must_use]
    pub fn add_secs(self, secs: i64) -> Self {
        Self(self.0 + chrono::Duration::seconds(secs))
    }

    /// Returns a timestamp offset forward by the given number of whole days.
    #[must_use]
    pub fn add_days(self, days: i64) -> Self {
        Self(self.0 + chrono::Duration::days(days))
    }

    /// Returns the `YYMM` pair for this instant.
    ///
    /// Used by [`RfqNumber`](super::rfq_number::RfqNumber) to scope the
    /// sequential counter to a tenant-month.
    #[must_use]
    pub fn yymm(self) -> String {
        format!("{:02}{:02}", self.0.year() % 100, self.0.month())
    }

    /// Returns true if this instant is strictly after `other`.
    #[inline]
    #[must_use]
    pub fn is_after(self, other: Self) -> bool {
        self.0 > other.0
    }

    /// Returns the Unix timestamp in seconds.
    #[inline]
    #[must_use]
    pub const fn unix_secs(self) -> i64 {
        self.0.timestamp()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    #[inline]
    fn from(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }
}
