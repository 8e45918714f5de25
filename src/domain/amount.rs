//! Amount type
//!
//! Domain primitive for monetary amounts moved by ledger operations.
//! All amounts are validated at construction time, ensuring invalid values
//! cannot reach an account balance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum decimal places, matching the `NUMERIC(20, 8)` balance column
const MAX_SCALE: u32 = 8;

/// `NUMERIC(20, 8)` keeps 12 integer digits
const BALANCE_LIMIT: i64 = 1_000_000_000_000;

/// Exclusive upper bound for amounts and balances
pub fn balance_limit() -> Decimal {
    Decimal::from(BALANCE_LIMIT)
}

/// Amount represents a validated monetary value.
///
/// # Invariants
/// - Value is always positive (> 0)
/// - Maximum 8 decimal places
/// - Below 1 trillion
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use finance_ledger::domain::Amount;
///
/// let amount = Amount::new(Decimal::new(100, 0)).unwrap();
/// assert_eq!(amount.value(), Decimal::new(100, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

/// Errors that can occur when creating an Amount
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("must be positive (got {0})")]
    NotPositive(Decimal),

    #[error("too many decimal places (max 8, got {0})")]
    TooManyDecimals(u32),

    #[error("must be below 1000000000000 (got {0})")]
    ExceedsMaximum(Decimal),

    #[error("would take the balance out of range")]
    BalanceOutOfRange,
}

impl Amount {
    /// Create a new Amount with validation.
    ///
    /// # Errors
    /// - `AmountError::NotPositive` if value <= 0
    /// - `AmountError::TooManyDecimals` if more than 8 decimal places
    /// - `AmountError::ExceedsMaximum` if value >= 1 trillion
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value <= Decimal::ZERO {
            return Err(AmountError::NotPositive(value));
        }

        // Trailing zeros do not count against the scale limit
        let normalized = value.normalize();
        if normalized.scale() > MAX_SCALE {
            return Err(AmountError::TooManyDecimals(normalized.scale()));
        }

        if normalized >= balance_limit() {
            return Err(AmountError::ExceedsMaximum(normalized));
        }

        Ok(Self(normalized))
    }

    /// Create an Amount from an integer (no decimal places).
    pub fn from_integer(value: i64) -> Result<Self, AmountError> {
        Self::new(Decimal::from(value))
    }

    /// Get the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Check if a balance covers this amount.
    pub fn is_covered_by(&self, balance: Decimal) -> bool {
        self.0 <= balance
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_positive() {
        let amount = Amount::new(Decimal::new(100, 0));
        assert!(amount.is_ok());
        assert_eq!(amount.unwrap().value(), Decimal::new(100, 0));
    }

    #[test]
    fn test_amount_zero_rejected() {
        let amount = Amount::new(Decimal::ZERO);
        assert!(matches!(amount, Err(AmountError::NotPositive(_))));
    }

    #[test]
    fn test_amount_negative_rejected() {
        let amount = Amount::from_integer(-2);
        assert_eq!(amount, Err(AmountError::NotPositive(Decimal::new(-2, 0))));
    }

    #[test]
    fn test_amount_too_many_decimals() {
        // 0.123456789 has 9 decimal places
        let amount = Amount::new(Decimal::new(123456789, 9));
        assert!(matches!(amount, Err(AmountError::TooManyDecimals(9))));
    }

    #[test]
    fn test_trailing_zeros_ignored_for_scale() {
        // 1.0000000000 normalizes to 1
        let amount = Amount::new(Decimal::new(10_000_000_000, 10)).unwrap();
        assert_eq!(amount.value(), Decimal::ONE);
        assert_eq!(amount.value().scale(), 0);
    }

    #[test]
    fn test_amount_upper_bound() {
        let largest = balance_limit() - Decimal::new(1, 8);
        assert_eq!(Amount::new(largest).unwrap().value(), largest);

        assert_eq!(
            Amount::from_integer(1_000_000_000_000),
            Err(AmountError::ExceedsMaximum(balance_limit()))
        );
        assert!(matches!(
            Amount::new(Decimal::MAX),
            Err(AmountError::ExceedsMaximum(_))
        ));
    }

    #[test]
    fn test_is_covered_by() {
        let amount = Amount::from_integer(1000).unwrap();
        assert!(amount.is_covered_by(Decimal::new(1000, 0)));
        assert!(amount.is_covered_by(Decimal::new(3000, 0)));
        assert!(!amount.is_covered_by(Decimal::new(99999, 2)));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AmountError::NotPositive(Decimal::new(-5, 0)).to_string(),
            "must be positive (got -5)"
        );
        assert_eq!(
            AmountError::TooManyDecimals(9).to_string(),
            "too many decimal places (max 8, got 9)"
        );
        assert_eq!(
            AmountError::ExceedsMaximum(Decimal::new(10_000_000_000_000, 0)).to_string(),
            "must be below 1000000000000 (got 10000000000000)"
        );
    }
}
