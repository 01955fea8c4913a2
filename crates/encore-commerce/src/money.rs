//! Money type for representing monetary values.
//!
//! Uses cents-based integer representation. Provider APIs speak decimal
//! numbers, so conversion happens only at the wire boundary.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    BRL,
    USD,
}

impl Currency {
    /// Get the currency code (e.g., "BRL").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::BRL => "BRL",
            Currency::USD => "USD",
        }
    }

    /// Get the currency symbol (e.g., "R$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::BRL => "R$",
            Currency::USD => "$",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "BRL" => Some(Currency::BRL),
            "USD" => Some(Currency::USD),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (centavos for BRL).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit.
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from cents.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a Money value from a decimal amount, rounding to the nearest cent.
    ///
    /// ```
    /// use encore_commerce::money::{Money, Currency};
    /// let price = Money::from_decimal(89.9, Currency::BRL);
    /// assert_eq!(price.amount_cents, 8990);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let multiplier = 10_i64.pow(currency.decimal_places());
        let amount_cents = (amount * multiplier as f64).round() as i64;
        Self::new(amount_cents, currency)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.amount_cents > 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        let divisor = 10_i64.pow(self.currency.decimal_places());
        self.amount_cents as f64 / divisor as f64
    }

    /// Format as a display string (e.g., "R$ 49.90").
    pub fn display(&self) -> String {
        format!("{} {}", self.currency.symbol(), self.display_amount())
    }

    /// Format without symbol (e.g., "49.90").
    pub fn display_amount(&self) -> String {
        let places = self.currency.decimal_places() as usize;
        format!("{:.places$}", self.to_decimal())
    }

    /// Add another Money value, failing on currency mismatch or overflow.
    pub fn checked_add(&self, other: &Money) -> Result<Money, CommerceError> {
        self.ensure_same_currency(other)?;
        self.amount_cents
            .checked_add(other.amount_cents)
            .map(|cents| Money::new(cents, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    /// Subtract another Money value, failing on currency mismatch or overflow.
    pub fn checked_sub(&self, other: &Money) -> Result<Money, CommerceError> {
        self.ensure_same_currency(other)?;
        self.amount_cents
            .checked_sub(other.amount_cents)
            .map(|cents| Money::new(cents, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    /// Multiply by an integer factor (e.g., a quantity).
    pub fn checked_mul(&self, factor: i64) -> Result<Money, CommerceError> {
        self.amount_cents
            .checked_mul(factor)
            .map(|cents| Money::new(cents, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    /// Take `percent` off this amount, rounding the discount to the nearest cent.
    pub fn percentage_off(&self, percent: f64) -> Money {
        let discount = (self.amount_cents as f64 * percent / 100.0).round() as i64;
        Money::new(self.amount_cents - discount, self.currency)
    }

    /// Sum an iterator of Money values.
    pub fn try_sum<'a>(
        mut iter: impl Iterator<Item = &'a Money>,
        currency: Currency,
    ) -> Result<Money, CommerceError> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.checked_add(m))
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), CommerceError> {
        if self.currency != other.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: other.currency.code().to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Parse a customer-entered amount such as `"12,50"` or `"12.50"`.
///
/// The first comma is treated as the decimal separator. The result must be a
/// finite number greater than zero and is rounded to cents.
pub fn parse_amount(text: &str, currency: Currency) -> Result<Money, CommerceError> {
    let normalized = text.trim().replacen(',', ".", 1);
    let value: f64 = normalized
        .parse()
        .map_err(|_| CommerceError::InvalidAmount(text.to_string()))?;
    positive_amount(value, currency)
}

/// Validate a decimal amount and convert it to Money.
pub fn positive_amount(value: f64, currency: Currency) -> Result<Money, CommerceError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CommerceError::InvalidAmount(value.to_string()));
    }
    let money = Money::from_decimal(value, currency);
    if !money.is_positive() {
        return Err(CommerceError::InvalidAmount(value.to_string()));
    }
    Ok(money)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_decimal() {
        let m = Money::from_decimal(49.99, Currency::BRL);
        assert_eq!(m.amount_cents, 4999);

        let m = Money::from_decimal(0.1 + 0.2, Currency::BRL);
        assert_eq!(m.amount_cents, 30);
    }

    #[test]
    fn test_money_display() {
        let m = Money::new(8990, Currency::BRL);
        assert_eq!(m.display(), "R$ 89.90");
        assert_eq!(m.display_amount(), "89.90");
    }

    #[test]
    fn test_checked_add() {
        let a = Money::new(1000, Currency::BRL);
        let b = Money::new(550, Currency::BRL);
        assert_eq!(a.checked_add(&b).unwrap().amount_cents, 1550);
    }

    #[test]
    fn test_currency_mismatch() {
        let brl = Money::new(1000, Currency::BRL);
        let usd = Money::new(1000, Currency::USD);
        assert!(matches!(
            brl.checked_add(&usd),
            Err(CommerceError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_checked_mul_overflow() {
        let m = Money::new(i64::MAX, Currency::BRL);
        assert!(matches!(m.checked_mul(2), Err(CommerceError::Overflow)));
    }

    #[test]
    fn test_percentage_off() {
        let m = Money::new(10000, Currency::BRL);
        assert_eq!(m.percentage_off(1.0).amount_cents, 9900);

        // 1% of 12345 is 123.45, rounds to 123
        let m = Money::new(12345, Currency::BRL);
        assert_eq!(m.percentage_off(1.0).amount_cents, 12222);
    }

    #[test]
    fn test_try_sum() {
        let values = [Money::new(100, Currency::BRL), Money::new(250, Currency::BRL)];
        let total = Money::try_sum(values.iter(), Currency::BRL).unwrap();
        assert_eq!(total.amount_cents, 350);

        let mixed = [Money::new(100, Currency::BRL), Money::new(100, Currency::USD)];
        assert!(Money::try_sum(mixed.iter(), Currency::BRL).is_err());
        assert_eq!(
            Money::try_sum(std::iter::empty(), Currency::BRL).unwrap(),
            Money::zero(Currency::BRL)
        );
    }

    #[test]
    fn test_parse_amount_accepts_comma_and_dot() {
        assert_eq!(parse_amount("12,50", Currency::BRL).unwrap().amount_cents, 1250);
        assert_eq!(parse_amount("12.5", Currency::BRL).unwrap().amount_cents, 1250);
        assert_eq!(parse_amount(" 99.999 ", Currency::BRL).unwrap().amount_cents, 10000);
    }

    #[test]
    fn test_parse_amount_rejects_invalid() {
        assert!(parse_amount("abc", Currency::BRL).is_err());
        assert!(parse_amount("0", Currency::BRL).is_err());
        assert!(parse_amount("-3,00", Currency::BRL).is_err());
        assert!(parse_amount("NaN", Currency::BRL).is_err());
        assert!(parse_amount("0.001", Currency::BRL).is_err());
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("BRL"), Some(Currency::BRL));
        assert_eq!(Currency::from_code("usd"), Some(Currency::USD));
        assert_eq!(Currency::from_code("EUR"), None);
    }
}
