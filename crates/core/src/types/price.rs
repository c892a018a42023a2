//! Decimal price representation.
//!
//! Prices travel as plain JSON numbers (`"price": 699`) and are shown in
//! FCFA, the only currency the backend deals in.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Display suffix for prices.
pub const CURRENCY_SUFFIX: &str = "FCFA";

/// A price or monetary total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display with grouped thousands, e.g. `1 250 000 FCFA`.
    #[must_use]
    pub fn display(&self) -> String {
        let normalized = self.0.normalize();
        let text = normalized.abs().to_string();
        let (whole, fraction) = text
            .split_once('.')
            .map_or((text.as_str(), None), |(w, f)| (w, Some(f)));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(' ');
            }
            grouped.push(digit);
        }

        let sign = if normalized.is_sign_negative() && !normalized.is_zero() {
            "-"
        } else {
            ""
        };

        match fraction {
            Some(fraction) => format!("{sign}{grouped},{fraction} {CURRENCY_SUFFIX}"),
            None => format!("{sign}{grouped} {CURRENCY_SUFFIX}"),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

// Wire format is a JSON number, not rust_decimal's default string.
impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <Decimal as Deserialize>::deserialize(deserializer).map(Self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_display_groups_thousands() {
        assert_eq!(Price::from_units(699).display(), "699 FCFA");
        assert_eq!(Price::from_units(1_250_000).display(), "1 250 000 FCFA");
        assert_eq!(Price::new(Decimal::new(1999, 2)).display(), "19,99 FCFA");
    }

    #[test]
    fn test_price_display_negative() {
        assert_eq!(Price::from_units(-4500).display(), "-4 500 FCFA");
    }

    #[test]
    fn test_price_serializes_as_number() {
        let json = serde_json::to_string(&Price::from_units(159)).unwrap();
        assert_eq!(json, "159.0");
    }

    #[test]
    fn test_price_accepts_number_and_string() {
        let from_number: Price = serde_json::from_str("89.5").unwrap();
        let from_string: Price = serde_json::from_str("\"89.5\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.amount(), Decimal::new(895, 1));
    }
}
