//! # RFQ Number
//!
//! Tenant-scoped human-readable RFQ number.
//!
//! This module provides [`RfqNumber`], the `PREFIX-YYMM-NNNNN` identifier
//! shown to buyers and suppliers. The number is generated exactly once when
//! an RFQ is first persisted and never regenerated afterwards; the sequence
//! component is unique per tenant per month and must come from an atomic
//! counter (never from counting existing records).
//!
//! # Examples
//!
//! ```
//! use rfq_engine::domain::value_objects::rfq_number::RfqNumber;
//!
//! let number = RfqNumber::format("RFQ", "2608", 42).unwrap();
//! assert_eq!(number.as_str(), "RFQ-2608-00042");
//!
//! let parsed: RfqNumber = "RFQ-2608-00042".parse().unwrap();
//! assert_eq!(parsed.sequence(), 42);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when an RFQ number cannot be formed or parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RfqNumberError {
    /// Prefix was empty or contained non-alphanumeric characters.
    #[error("invalid prefix: {0}")]
    InvalidPrefix(String),

    /// Year-month component was not four digits.
    #[error("invalid year-month component: {0}")]
    InvalidYearMonth(String),

    /// Sequence exceeded the five-digit space.
    #[error("sequence out of range: {0}")]
    SequenceOutOfRange(u32),

    /// Input did not match `PREFIX-YYMM-NNNNN`.
    #[error("malformed rfq number: {0}")]
    Malformed(String),
}

/// A formatted, tenant-scoped RFQ number (`PREFIX-YYMM-NNNNN`).
///
/// Zero-padded components make the lexicographic order match issue order
/// within a prefix and month.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RfqNumber(String);

impl RfqNumber {
    /// Largest sequence representable in the five-digit slot.
    pub const MAX_SEQUENCE: u32 = 99_999;

    /// Formats a number from its components.
    ///
    /// # Errors
    ///
    /// Returns an [`RfqNumberError`] when the prefix is not ASCII
    /// alphanumeric and non-empty, the year-month is not four digits, or
    /// the sequence exceeds [`Self::MAX_SEQUENCE`].
    pub fn format(prefix: &str, yymm: &str, sequence: u32) -> Result<Self, RfqNumberError> {
        if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(RfqNumberError::InvalidPrefix(prefix.to_owned()));
        }
        if yymm.len() != 4 || !yymm.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RfqNumberError::InvalidYearMonth(yymm.to_owned()));
        }
        if sequence == 0 || sequence > Self::MAX_SEQUENCE {
            return Err(RfqNumberError::SequenceOutOfRange(sequence));
        }
        Ok(Self(format!("{prefix}-{yymm}-{sequence:05}")))
    }

    /// Returns the full number as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the prefix component.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.0.split('-').next().unwrap_or_default()
    }

    /// Returns the `YYMM` component.
    #[must_use]
    pub fn yymm(&self) -> &str {
        self.0.split('-').nth(1).unwrap_or_default()
    }

    /// Returns the numeric sequence component.
    #[must_use]
    pub fn sequence(&self) -> u32 {
        self.0
            .split('-')
            .nth(2)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }
}

impl fmt::Display for RfqNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RfqNumber {
    type Err = RfqNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('-');
        let (prefix, yymm, seq) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(p), Some(y), Some(n), None) => (p, y, n),
            _ => return Err(RfqNumberError::Malformed(s.to_owned())),
        };
        if seq.len() != 5 {
            return Err(RfqNumberError::Malformed(s.to_owned()));
        }
        let sequence: u32 = seq
            .parse()
            .map_err(|_| RfqNumberError::Malformed(s.to_owned()))?;
        Self::format(prefix, yymm, sequence)
    }
}
