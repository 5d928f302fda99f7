//! Value objects shared by orders, SKUs and charges.

use serde::{Deserialize, Serialize};

/// ISO 4217 currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Jpy,
    Cad,
    Aud,
}

impl Currency {
    /// Returns the ISO code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "JPY" => Ok(Currency::Jpy),
            "CAD" => Ok(Currency::Cad),
            "AUD" => Ok(Currency::Aud),
            other => Err(format!("unsupported currency: {other}")),
        }
    }
}

/// A signed amount in minor units of a single currency.
///
/// There is no conversion between currencies: combining amounts in
/// different currencies fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: i64,
    currency: Currency,
}

impl Money {
    /// Creates an amount in minor units.
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Returns zero in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Returns the amount in minor units.
    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Adds another amount in the same currency.
    ///
    /// Returns None on a currency mismatch or overflow; use
    /// [`Money::checked_add`] to tell the two apart.
    pub fn try_add(&self, other: Money) -> Option<Money> {
        self.checked_add(other).ok()
    }

    /// Adds another amount, reporting which rule was broken.
    pub fn checked_add(&self, other: Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch {
                expected: self.currency,
                found: other.currency,
            });
        }
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(MoneyError::Overflow)?;
        Ok(Money::new(amount, self.currency))
    }

    /// Multiplies by a quantity.
    pub fn checked_mul(&self, quantity: i64) -> Result<Money, MoneyError> {
        let amount = self
            .amount
            .checked_mul(quantity)
            .ok_or(MoneyError::Overflow)?;
        Ok(Money::new(amount, self.currency))
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// Arithmetic failures on [`Money`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoneyError {
    CurrencyMismatch { expected: Currency, found: Currency },
    Overflow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_serializes_uppercase() {
        let json = serde_json::to_string(&Currency::Eur).unwrap();
        assert_eq!(json, "\"EUR\"");
        let parsed: Currency = serde_json::from_str("\"GBP\"").unwrap();
        assert_eq!(parsed, Currency::Gbp);
    }

    #[test]
    fn test_currency_from_str_is_case_insensitive() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert!("XYZ".parse::<Currency>().is_err());
    }

    #[test]
    fn test_money_add_same_currency() {
        let a = Money::new(1500, Currency::Usd);
        let b = Money::new(-1000, Currency::Usd);
        assert_eq!(a.checked_add(b).unwrap().amount(), 500);
    }

    #[test]
    fn test_money_add_currency_mismatch() {
        let a = Money::new(100, Currency::Usd);
        let b = Money::new(100, Currency::Eur);
        assert_eq!(
            a.checked_add(b),
            Err(MoneyError::CurrencyMismatch {
                expected: Currency::Usd,
                found: Currency::Eur
            })
        );
        assert!(a.try_add(b).is_none());
    }

    #[test]
    fn test_money_overflow() {
        let a = Money::new(i64::MAX, Currency::Usd);
        assert_eq!(a.checked_mul(2), Err(MoneyError::Overflow));
        assert_eq!(
            a.checked_add(Money::new(1, Currency::Usd)),
            Err(MoneyError::Overflow)
        );
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(2050, Currency::Usd).to_string(), "2050 USD");
    }
}
