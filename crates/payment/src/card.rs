//! Card details.

use serde::{Deserialize, Serialize};

/// Card network, derived from the card number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    Discover,
    Unknown,
}

impl CardBrand {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardBrand::Visa => "visa",
            CardBrand::Mastercard => "mastercard",
            CardBrand::Amex => "amex",
            CardBrand::Discover => "discover",
            CardBrand::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for CardBrand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Card details supplied with a payment.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub number: String,
    pub exp_month: u32,
    pub exp_year: u32,
    pub cvc: String,
}

impl Card {
    pub fn new(
        number: impl Into<String>,
        exp_month: u32,
        exp_year: u32,
        cvc: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            exp_month,
            exp_year,
            cvc: cvc.into(),
        }
    }

    /// Card network by issuer prefix.
    pub fn brand(&self) -> CardBrand {
        let digits = self.number.as_bytes();
        match digits {
            [b'4', ..] => CardBrand::Visa,
            [b'5', b'1'..=b'5', ..] | [b'2', ..] => CardBrand::Mastercard,
            [b'3', b'4' | b'7', ..] => CardBrand::Amex,
            [b'6', ..] => CardBrand::Discover,
            _ => CardBrand::Unknown,
        }
    }

    /// Last four digits, for logs and statements.
    pub fn last4(&self) -> &str {
        let start = self.number.len().saturating_sub(4);
        self.number.get(start..).unwrap_or_default()
    }

    /// Returns true if every required field is present.
    pub fn is_complete(&self) -> bool {
        !self.number.is_empty()
            && !self.cvc.is_empty()
            && (1..=12).contains(&self.exp_month)
            && self.exp_year > 0
    }
}

impl std::fmt::Debug for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Card")
            .field("brand", &self.brand())
            .field("last4", &self.last4())
            .field("exp_month", &self.exp_month)
            .field("exp_year", &self.exp_year)
            .finish()
    }
}
