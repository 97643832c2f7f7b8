//! Quantity and price values with lenient coercion.
//!
//! Both types uphold their invariant at construction, so an `Item` can never
//! hold a zero quantity or a negative price no matter where the input came
//! from (user entry, remote payload, or a test).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of units of an item. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub const ONE: Quantity = Quantity(1);

    /// Parse user or remote text the way a browser `parseInt` would, falling
    /// back to 1 for anything that does not yield a positive integer.
    ///
    /// `"2.7"` becomes 2, `"3 boxes"` becomes 3, `"-4"`, `"0"` and `"abc"`
    /// become 1.
    pub fn coerce(input: &str) -> Self {
        let trimmed = input.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        let leading = &digits[..end];

        if negative || leading.is_empty() {
            return Self::ONE;
        }

        // All-digit strings only fail to parse on overflow.
        let value = leading.parse::<u32>().unwrap_or(u32::MAX);
        Self::from(value)
    }

    /// Coerce a floating point number, truncating toward zero.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() || value < 1.0 {
            return Self::ONE;
        }
        if value >= u32::MAX as f64 {
            return Self(u32::MAX);
        }
        Self(value.trunc() as u32)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl From<u32> for Quantity {
    fn from(value: u32) -> Self {
        Self(value.max(1))
    }
}

impl From<&str> for Quantity {
    fn from(value: &str) -> Self {
        Self::coerce(value)
    }
}

impl From<Quantity> for u32 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Unit price of an item. Always finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Price(f64);

impl Price {
    pub const ZERO: Price = Price(0.0);

    /// Parse a decimal amount, accepting a decimal comma ("3,50").
    /// Anything that is not a finite non-negative number becomes 0.
    pub fn coerce(input: &str) -> Self {
        let normalized = input.trim().replace(',', ".");
        match normalized.parse::<f64>() {
            Ok(value) => Self::from(value),
            Err(_) => Self::ZERO,
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl From<f64> for Price {
    fn from(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            Self(value)
        } else {
            Self::ZERO
        }
    }
}

impl From<&str> for Price {
    fn from(value: &str) -> Self {
        Self::coerce(value)
    }
}

impl From<Price> for f64 {
    fn from(value: Price) -> Self {
        value.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_from_int_never_zero() {
        assert_eq!(Quantity::from(0).get(), 1);
        assert_eq!(Quantity::from(5).get(), 5);
    }

    #[test]
    fn test_quantity_coerce_text() {
        assert_eq!(Quantity::coerce("2").get(), 2);
        assert_eq!(Quantity::coerce("  7 ").get(), 7);
        assert_eq!(Quantity::coerce("2.7").get(), 2);
        assert_eq!(Quantity::coerce("3 boxes").get(), 3);
        assert_eq!(Quantity::coerce("+4").get(), 4);
        assert_eq!(Quantity::coerce("-4").get(), 1);
        assert_eq!(Quantity::coerce("0").get(), 1);
        assert_eq!(Quantity::coerce("abc").get(), 1);
        assert_eq!(Quantity::coerce("").get(), 1);
        assert_eq!(Quantity::coerce("99999999999999").get(), u32::MAX);
    }

    #[test]
    fn test_quantity_from_f64() {
        assert_eq!(Quantity::from_f64(2.9).get(), 2);
        assert_eq!(Quantity::from_f64(0.5).get(), 1);
        assert_eq!(Quantity::from_f64(f64::NAN).get(), 1);
        assert_eq!(Quantity::from_f64(-3.0).get(), 1);
    }

    #[test]
    fn test_price_coerce_text() {
        assert_eq!(Price::coerce("3.5").get(), 3.5);
        assert_eq!(Price::coerce("3,50").get(), 3.5);
        assert_eq!(Price::coerce(" 10 ").get(), 10.0);
        assert_eq!(Price::coerce("").get(), 0.0);
        assert_eq!(Price::coerce("free").get(), 0.0);
        assert_eq!(Price::coerce("-2").get(), 0.0);
        assert_eq!(Price::coerce("inf").get(), 0.0);
        assert_eq!(Price::coerce("NaN").get(), 0.0);
    }

    #[test]
    fn test_price_from_f64_rejects_non_finite() {
        assert_eq!(Price::from(f64::INFINITY), Price::ZERO);
        assert_eq!(Price::from(-0.01), Price::ZERO);
        assert_eq!(Price::from(4.25).get(), 4.25);
    }

    #[test]
    fn test_serde_applies_coercion() {
        let quantity: Quantity = serde_json::from_str("0").unwrap();
        assert_eq!(quantity, Quantity::ONE);

        let price: Price = serde_json::from_str("-1.5").unwrap();
        assert_eq!(price, Price::ZERO);

        assert_eq!(serde_json::to_string(&Quantity::from(3)).unwrap(), "3");
    }

    #[test]
    fn test_price_display_two_decimals() {
        assert_eq!(Price::from(3.5).to_string(), "3.50");
    }
}
