//! Monetary value type with full internal precision.
//!
//! Uses `rust_decimal` internally. Amounts keep whatever precision their
//! source text carried; rounding to 2 decimal places happens only at the
//! boundary (display, derived payment amounts, output) so that summing many
//! lines never accumulates rounding drift.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

/// A decimal monetary value.
///
/// Arithmetic is exact; only [`Money::rounded`] and the `Display`
/// implementation commit to the 2-decimal-place presentation used for
/// invoices and payment amounts.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use invoice_engine::Money;
///
/// let amount = Money::from_str("10.5").unwrap();
/// assert_eq!(amount.to_string(), "10.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Money(Decimal);

impl Money {
    /// The number of decimal places shown at the boundary.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Creates a new `Money` from a `Decimal`, keeping its precision.
    pub fn new(value: Decimal) -> Self {
        Money(value)
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if this value is negative.
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Rounds to 2 decimal places, midpoint away from zero.
    ///
    /// Used when an amount crosses the boundary back into user-visible
    /// state, e.g. the auto-derived amount of a "full" payment.
    pub fn rounded(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal = Decimal::from_str(trimmed)?;
        Ok(Money::new(decimal))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded().0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        Money(self.0 * Decimal::from(rhs))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Money::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_two_places() {
        let m = Money::from_str("1").unwrap();
        assert_eq!(m.to_string(), "1.00");

        let m = Money::from_str("1.5").unwrap();
        assert_eq!(m.to_string(), "1.50");

        let m = Money::from_str("  2.25  ").unwrap();
        assert_eq!(m.to_string(), "2.25");
    }

    #[test]
    fn test_internal_precision_preserved() {
        // Sub-cent inputs only round at the boundary, not during arithmetic.
        let a = Money::from_str("0.005").unwrap();
        let b = Money::from_str("0.005").unwrap();
        let sum = a + b;

        assert_eq!(sum, Money::from_str("0.01").unwrap());
        assert_eq!(a.to_string(), "0.01"); // display rounds away from zero
    }

    #[test]
    fn test_rounded_midpoint_away_from_zero() {
        assert_eq!(Money::from_str("2.345").unwrap().rounded().to_string(), "2.35");
        assert_eq!(
            Money::from_str("-2.345").unwrap().rounded().to_string(),
            "-2.35"
        );
    }

    #[test]
    fn test_multiply_by_quantity() {
        let price = Money::from_str("19.99").unwrap();
        assert_eq!((price * 3).to_string(), "59.97");
    }

    #[test]
    fn test_sum_and_comparison() {
        let total: Money = ["10.00", "20.50", "0.25"]
            .iter()
            .map(|s| Money::from_str(s).unwrap())
            .sum();

        assert_eq!(total.to_string(), "30.75");
        assert!(total > Money::ZERO);
        assert!(Money::from_str("-1").unwrap().is_negative());
        assert!(Money::ZERO.is_zero());
    }
}
