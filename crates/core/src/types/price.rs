//! Type-safe price representation using decimal arithmetic.
//!
//! Prices travel over the wire as plain JSON numbers (`179.9`), the way the
//! catalog API serves them, and are held as [`Decimal`] in memory so that
//! subtotals never pick up floating point noise.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in the store's currency.
///
/// Serialized as a JSON number, which passes through `f64`. Catalog prices
/// (two decimal places, well under 15 significant digits) round-trip exactly;
/// values with more significant digits than `f64` carries do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in the smallest currency unit (cents).
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The decimal amount in the currency's standard unit.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display, e.g. `R$ 1.299,90` or `$1,299.90`.
    #[must_use]
    pub fn format(&self, currency: CurrencyCode) -> String {
        let rounded = self.0.round_dp(2);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let plain = format!("{:.2}", rounded.abs());
        let (whole, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
        let (group_sep, decimal_sep) = currency.separators();

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(group_sep);
            }
            grouped.push(digit);
        }

        let sign = if negative { "-" } else { "" };
        format!(
            "{sign}{}{grouped}{decimal_sep}{cents}",
            currency.symbol()
        )
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self(self.0 * Decimal::from(rhs))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// ISO 4217 currency codes the storefront can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    BRL,
    USD,
    EUR,
}

impl CurrencyCode {
    /// Display symbol, including any trailing space.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::BRL => "R$ ",
            Self::USD => "$",
            Self::EUR => "€",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BRL => "BRL",
            Self::USD => "USD",
            Self::EUR => "EUR",
        }
    }

    /// Thousands and decimal separators for the currency's usual locale.
    const fn separators(self) -> (char, char) {
        match self {
            Self::BRL | Self::EUR => ('.', ','),
            Self::USD => (',', '.'),
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error parsing a currency code.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported currency code: {0}")]
pub struct CurrencyCodeError(pub String);

impl FromStr for CurrencyCode {
    type Err = CurrencyCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BRL" => Ok(Self::BRL),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            other => Err(CurrencyCodeError(other.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_deserializes_from_number_and_string() {
        let from_number: Price = serde_json::from_str("179.9").unwrap();
        let from_string: Price = serde_json::from_str("\"179.90\"").unwrap();
        assert_eq!(from_number, Price::from_cents(17990));
        assert_eq!(from_string, Price::from_cents(17990));
    }

    #[test]
    fn test_price_serializes_as_number() {
        let json = serde_json::to_string(&Price::from_cents(13990)).unwrap();
        assert_eq!(json, "139.9");
    }

    #[test]
    fn test_catalog_prices_survive_persist_and_reload() {
        for cents in [1, 13990, 17990, 21990, 999_999_999_999] {
            let price = Price::from_cents(cents);
            let reloaded: Price = serde_json::from_str(&serde_json::to_string(&price).unwrap()).unwrap();
            assert_eq!(reloaded, price);
        }
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(Price::from_cents(17990).format(CurrencyCode::BRL), "R$ 179,90");
        assert_eq!(
            Price::from_cents(129_990).format(CurrencyCode::BRL),
            "R$ 1.299,90"
        );
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(Price::from_cents(5).format(CurrencyCode::USD), "$0.05");
        assert_eq!(
            Price::from_cents(123_456_789).format(CurrencyCode::USD),
            "$1,234,567.89"
        );
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(Price::from_cents(-250).format(CurrencyCode::USD), "-$2.50");
    }

    #[test]
    fn test_arithmetic() {
        let unit = Price::from_cents(10_050);
        assert_eq!(unit * 3, Price::from_cents(30_150));
        let total: Price = [unit, Price::from_cents(50)].into_iter().sum();
        assert_eq!(total, Price::from_cents(10_100));
    }

    #[test]
    fn test_currency_code_from_str() {
        assert_eq!("brl".parse::<CurrencyCode>().unwrap(), CurrencyCode::BRL);
        assert_eq!(" USD ".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }
}
