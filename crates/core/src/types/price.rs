//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// Displays with its currency symbol and two decimals; midpoints round away
/// from zero, matching how shoppers expect `$0.005` to display.
///
/// ```
/// use rust_decimal::Decimal;
/// use shopfront_core::{CurrencyCode, Price};
///
/// let price = Price::new(Decimal::new(1999, 2), CurrencyCode::USD);
/// assert_eq!(price.to_string(), "$19.99");
/// ```
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
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "{}{rounded:.2}", self.currency_code.symbol())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Every supported currency.
    pub const ALL: [Self; 5] = [Self::USD, Self::EUR, Self::GBP, Self::CAD, Self::AUD];

    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }

    /// Look up a currency by ISO code, ignoring case.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|currency| currency.code().eq_ignore_ascii_case(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_two_decimals() {
        assert_eq!(Price::new(Decimal::new(35, 0), CurrencyCode::USD).to_string(), "$35.00");
        assert_eq!(Price::new(Decimal::new(599, 2), CurrencyCode::USD).to_string(), "$5.99");
    }

    #[test]
    fn test_display_rounds_midpoint_away_from_zero() {
        assert_eq!(Price::new(Decimal::new(1005, 3), CurrencyCode::USD).to_string(), "$1.01");
    }

    #[test]
    fn test_display_uses_currency_symbol() {
        assert_eq!(Price::new(Decimal::new(10_997, 2), CurrencyCode::GBP).to_string(), "£109.97");
        assert_eq!(Price::new(Decimal::ONE, CurrencyCode::EUR).to_string(), "€1.00");
    }

    #[test]
    fn test_from_code() {
        assert_eq!(CurrencyCode::from_code("usd"), Some(CurrencyCode::USD));
        assert_eq!(CurrencyCode::from_code("GBP"), Some(CurrencyCode::GBP));
        assert_eq!(CurrencyCode::from_code("JPY"), None);
        assert_eq!(CurrencyCode::default().code(), "USD");
    }
}
