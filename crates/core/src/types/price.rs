//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog records carry prices as plain JSON numbers (`139.9`). They are
//! parsed from their textual form straight into a [`Decimal`] so that no
//! binary floating point rounding leaks into cart totals.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Errors that can occur when reading a [`Price`] from catalog metadata.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The value is neither a number nor a numeric string.
    #[error("price must be a number, got {0}")]
    NotNumeric(String),
    /// The value is numeric but negative.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A zero price in the default currency.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(Decimal::ZERO, CurrencyCode::USD)
    }

    /// Read a price from a catalog metadata value.
    ///
    /// Accepts JSON numbers (including exponent notation) and numeric strings.
    /// The catalog does not send a currency, so the default currency is used.
    ///
    /// # Errors
    ///
    /// Returns `PriceError` if the value is not numeric or is negative.
    pub fn from_json(value: &Value) -> Result<Self, PriceError> {
        let text = match value {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.trim().to_string(),
            other => return Err(PriceError::NotNumeric(other.to_string())),
        };

        let amount = Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map_err(|_| PriceError::NotNumeric(text.clone()))?;

        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }

        Ok(Self::new(amount, CurrencyCode::default()))
    }

    /// Price of `quantity` units at this unit price.
    ///
    /// Returns `None` if the result does not fit in a `Decimal`.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Option<Self> {
        self.amount
            .checked_mul(Decimal::from(quantity))
            .map(|amount| Self::new(amount, self.currency_code))
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount.round_dp(2)
        )
    }
}

/// ISO 4217 currency codes.
///
/// The catalog quotes every price in US dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD => "$",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_from_json_number() {
        let price = Price::from_json(&json!(139.9)).unwrap();
        assert_eq!(price.amount, Decimal::new(1399, 1));
        assert_eq!(price.currency_code, CurrencyCode::USD);
    }

    #[test]
    fn test_price_from_json_string() {
        let price = Price::from_json(&json!(" 59.90 ")).unwrap();
        assert_eq!(price.amount, Decimal::new(5990, 2));
    }

    #[test]
    fn test_price_from_json_exponent() {
        let price = Price::from_json(&json!(1.5e2)).unwrap();
        assert_eq!(price.amount, Decimal::from(150));
    }

    #[test]
    fn test_price_from_json_rejects_non_numeric() {
        assert!(matches!(
            Price::from_json(&json!("free")),
            Err(PriceError::NotNumeric(_))
        ));
        assert!(matches!(
            Price::from_json(&json!(null)),
            Err(PriceError::NotNumeric(_))
        ));
    }

    #[test]
    fn test_price_from_json_rejects_negative() {
        assert!(matches!(
            Price::from_json(&json!(-1)),
            Err(PriceError::Negative(_))
        ));
    }

    #[test]
    fn test_price_times() {
        let price = Price::from_json(&json!(139.9)).unwrap();
        assert_eq!(price.times(3).unwrap().amount, Decimal::new(4197, 1));
    }

    #[test]
    fn test_price_times_overflow() {
        let price = Price::from_json(&json!("7e28")).unwrap();
        assert!(price.times(2).is_none());
        assert_eq!(price.times(1).unwrap(), price);
    }

    #[test]
    fn test_price_display() {
        let price = Price::new(Decimal::new(1399, 1), CurrencyCode::USD);
        assert_eq!(price.to_string(), "$139.90");
        assert_eq!(Price::zero().to_string(), "$0.00");
    }
}
