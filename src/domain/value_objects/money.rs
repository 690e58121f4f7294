//! # Money Value Object
//!
//! Decimal monetary amount with a currency code.
//!
//! This module provides the [`Money`] type used for quote totals, line-item
//! prices and target prices. Amounts are non-negative [`Decimal`] values so
//! ranking arithmetic is exact until the final score normalization.
//!
//! # Examples
//!
//! ```
//! use rfq_engine::domain::value_objects::money::Money;
//!
//! let total = Money::new(1250.50, "USD").unwrap();
//! assert_eq!(total.currency(), "USD");
//! assert!(!total.is_zero());
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors from constructing or combining [`Money`] values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// Amount could not be represented or was negative.
    #[error("invalid amount: {0}")]
    InvalidAmount(&'static str),

    /// Currency code was not three ASCII uppercase letters.
    #[error("invalid currency code: {0}")]
    InvalidCurrency(String),

    /// Two amounts in different currencies were combined.
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch {
        /// Left operand currency.
        left: String,
        /// Right operand currency.
        right: String,
    },

    /// Arithmetic overflow.
    #[error("amount overflow")]
    Overflow,
}

/// A validated, non-negative monetary amount in a single currency.
///
/// # Invariants
///
/// - `amount >= 0`
/// - `currency` is a three-letter uppercase ASCII code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: String,
}

impl Money {
    /// Creates a money value from an f64 amount and currency code.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::InvalidAmount`] for negative or
    /// non-representable amounts, [`MoneyError::InvalidCurrency`] for a
    /// malformed currency code.
    pub fn new(amount: f64, currency: impl Into<String>) -> Result<Self, MoneyError> {
        let decimal = Decimal::try_from(amount)
            .map_err(|_| MoneyError::InvalidAmount("not representable as a decimal"))?;
        Self::from_decimal(decimal, currency)
    }

    /// Creates a money value from a [`Decimal`] amount and currency code.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::InvalidAmount`] if the amount is negative,
    /// [`MoneyError::InvalidCurrency`] for a malformed currency code.
    pub fn from_decimal(amount: Decimal, currency: impl Into<String>) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() {
            return Err(MoneyError::InvalidAmount("amount cannot be negative"));
        }
        let currency = currency.into();
        if currency.len() != 3 || !currency.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(MoneyError::InvalidCurrency(currency));
        }
        Ok(Self { amount, currency })
    }

    /// Returns a zero amount in the given currency.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::InvalidCurrency`] for a malformed currency code.
    pub fn zero(currency: impl Into<String>) -> Result<Self, MoneyError> {
        Self::from_decimal(Decimal::ZERO, currency)
    }

    /// Returns the decimal amount.
    #[inline]
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency code.
    #[inline]
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Returns true if the amount is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns the amount as an f64 for score normalization.
    ///
    /// Lossy by design: only the evaluation engine consumes this, and it
    /// normalizes into [0, 100] before weighting.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.amount.to_f64().unwrap_or(0.0)
    }

    /// Checked addition of two amounts in the same currency.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::CurrencyMismatch`] for differing currencies and
    /// [`MoneyError::Overflow`] if the sum is not representable.
    pub fn checked_add(&self, rhs: &Self) -> Result<Self, MoneyError> {
        if self.currency != rhs.currency {
            return Err(MoneyError::CurrencyMismatch {
                left: self.currency.clone(),
                right: rhs.currency.clone(),
            });
        }
        let amount = self
            .amount
            .checked_add(rhs.amount)
            .ok_or(MoneyError::Overflow)?;
        Ok(Self {
            amount,
            currency: self.currency.clone(),
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_non_negative() {
        let money = Money::new(100.50, "USD").unwrap();
        assert_eq!(money.currency(), "USD");
        assert_eq!(money.amount().to_string(), "100.5");
    }

    #[test]
    fn new_rejects_negative() {
        assert!(matches!(
            Money::new(-1.0, "USD"),
            Err(MoneyError::InvalidAmount(_))
        ));
    }

    #[test]
    fn rejects_malformed_currency() {
        assert!(matches!(
            Money::new(1.0, "usd"),
            Err(MoneyError::InvalidCurrency(_))
        ));
        assert!(matches!(
            Money::new(1.0, "USDT"),
            Err(MoneyError::InvalidCurrency(_))
        ));
        assert!(matches!(
            Money::new(1.0, ""),
            Err(MoneyError::InvalidCurrency(_))
        ));
    }

    #[test]
    fn zero_is_zero() {
        let zero = Money::zero("EUR").unwrap();
        assert!(zero.is_zero());
    }

    #[test]
    fn checked_add_same_currency() {
        let a = Money::new(100.25, "USD").unwrap();
        let b = Money::new(50.25, "USD").unwrap();
        let sum = a.checked_add(&b).unwrap();
        assert_eq!(sum.amount().to_string(), "150.50");
    }

    #[test]
    fn checked_add_currency_mismatch() {
        let a = Money::new(1.0, "USD").unwrap();
        let b = Money::new(1.0, "EUR").unwrap();
        assert!(matches!(
            a.checked_add(&b),
            Err(MoneyError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn display_shows_amount_and_currency() {
        let money = Money::new(42.0, "GBP").unwrap();
        assert_eq!(money.to_string(), "42 GBP");
    }

    #[test]
    fn serde_roundtrip() {
        let money = Money::new(1234.56, "USD").unwrap();
        let json = serde_json::to_string(&money).unwrap();
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(money, back);
    }
}
