//! Monetary types
//!
//! Domain primitives for dues and payment amounts with business rule
//! validation. All amounts are validated at construction time, ensuring
//! invalid values cannot exist in the system.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum allowed single amount (1 million)
const MAX_AMOUNT: &str = "1000000";

/// Maximum decimal places (cents)
const MAX_SCALE: u32 = 2;

/// Amount represents a validated monetary value for a due or a payment.
///
/// # Invariants
/// - Value is always positive (> 0)
/// - Maximum 2 decimal places
/// - Maximum value is 1 million
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(Decimal);

/// Errors that can occur when creating an Amount
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount must be positive (got {0})")]
    NotPositive(Decimal),

    #[error("Amount has too many decimal places (max {MAX_SCALE}, got {0})")]
    TooManyDecimals(u32),

    #[error("Amount exceeds maximum allowed value ({MAX_AMOUNT})")]
    Overflow,

    #[error("Invalid amount format: {0}")]
    ParseError(String),
}

impl Amount {
    /// Create a new Amount with validation.
    ///
    /// # Errors
    /// - `AmountError::NotPositive` if value <= 0
    /// - `AmountError::TooManyDecimals` if more than 2 decimal places
    /// - `AmountError::Overflow` if value > 1 million
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value <= Decimal::ZERO {
            return Err(AmountError::NotPositive(value));
        }

        if value.scale() > MAX_SCALE {
            return Err(AmountError::TooManyDecimals(value.scale()));
        }

        let max = Decimal::from_str(MAX_AMOUNT).expect("Invalid MAX_AMOUNT constant");
        if value > max {
            return Err(AmountError::Overflow);
        }

        Ok(Self(value))
    }

    /// Create an Amount from an integer (no decimal places).
    pub fn from_integer(value: i64) -> Result<Self, AmountError> {
        Self::new(Decimal::from(value))
    }

    /// Get the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s)
            .map_err(|e| AmountError::ParseError(e.to_string()))?;
        Amount::new(decimal)
    }
}

impl TryFrom<String> for Amount {
    type Error = AmountError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Amount::from_str(&value)
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        format!("{:.2}", amount.0)
    }
}

/// Sum a sequence of decimal amounts with a decimal accumulator.
///
/// Monetary sums stay in `Decimal` end to end; they are never routed
/// through floating point.
pub fn sum_amounts<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().fold(Decimal::ZERO, |acc, a| acc + a)
}

/// OutstandingBalance represents the net amount a member still owes.
/// Unlike Amount, it can be zero, and it is derived rather than entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingBalance(Decimal);

impl OutstandingBalance {
    /// Net unsettled dues against recorded payments, clamped at zero.
    ///
    /// Overpayment never produces a negative balance.
    pub fn net(dues_total: Decimal, payments_total: Decimal) -> Self {
        let net = dues_total - payments_total;
        if net < Decimal::ZERO {
            Self(Decimal::ZERO)
        } else {
            Self(net)
        }
    }

    /// A settled (zero) balance
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Get the underlying value
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Whether the member owes anything
    pub fn is_settled(&self) -> bool {
        self.0 == Decimal::ZERO
    }
}

impl fmt::Display for OutstandingBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Default for OutstandingBalance {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_positive() {
        let amount = Amount::new(dec!(100));
        assert!(amount.is_ok());
        assert_eq!(amount.unwrap().value(), dec!(100));
    }

    #[test]
    fn test_amount_zero_rejected() {
        let amount = Amount::new(Decimal::ZERO);
        assert!(matches!(amount, Err(AmountError::NotPositive(_))));
    }

    #[test]
    fn test_amount_negative_rejected() {
        let amount = Amount::new(dec!(-100));
        assert!(matches!(amount, Err(AmountError::NotPositive(_))));
    }

    #[test]
    fn test_amount_too_many_decimals() {
        let amount = Amount::new(dec!(10.505));
        assert!(matches!(amount, Err(AmountError::TooManyDecimals(3))));
    }

    #[test]
    fn test_amount_max_decimals_ok() {
        let amount = Amount::new(dec!(10.50));
        assert!(amount.is_ok());
    }

    #[test]
    fn test_amount_overflow() {
        let amount = Amount::new(dec!(1000001));
        assert!(matches!(amount, Err(AmountError::Overflow)));
    }

    #[test]
    fn test_amount_max_value_ok() {
        let amount = Amount::new(dec!(1000000));
        assert!(amount.is_ok());
    }

    #[test]
    fn test_amount_from_str() {
        let amount: Result<Amount, _> = "123.45".parse();
        assert!(amount.is_ok());
        assert_eq!(amount.unwrap().value(), dec!(123.45));
    }

    #[test]
    fn test_amount_from_str_invalid() {
        let amount: Result<Amount, _> = "abc".parse();
        assert!(matches!(amount, Err(AmountError::ParseError(_))));
    }

    #[test]
    fn test_sum_amounts_decimal_exact() {
        // 0.1 + 0.2 must be exactly 0.3 with a decimal accumulator
        let total = sum_amounts(vec![dec!(0.1), dec!(0.2)]);
        assert_eq!(total, dec!(0.3));
    }

    #[test]
    fn test_sum_amounts_empty() {
        let total = sum_amounts(Vec::<Decimal>::new());
        assert_eq!(total, Decimal::ZERO);
    }

    #[test]
    fn test_balance_net_basic() {
        let balance = OutstandingBalance::net(dec!(80), dec!(20));
        assert_eq!(balance.value(), dec!(60));
        assert!(!balance.is_settled());
    }

    #[test]
    fn test_balance_net_clamps_overpayment() {
        let balance = OutstandingBalance::net(dec!(10), dec!(100));
        assert_eq!(balance.value(), Decimal::ZERO);
        assert!(balance.is_settled());
    }

    #[test]
    fn test_balance_net_exact_settlement() {
        let balance = OutstandingBalance::net(dec!(50), dec!(50));
        assert!(balance.is_settled());
    }
}
