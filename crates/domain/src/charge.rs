//! Payment provider receipts.

use serde::{Deserialize, Serialize};

use crate::Currency;

/// Payment provider identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// In-process provider for development and tests.
    #[default]
    Sandbox,
    Stripe,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Sandbox => "sandbox",
            ProviderId::Stripe => "stripe",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sandbox" => Ok(ProviderId::Sandbox),
            "stripe" => Ok(ProviderId::Stripe),
            other => Err(format!("unknown payment provider: {other}")),
        }
    }
}

/// A captured payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Charge {
    pub id: String,
    pub provider: ProviderId,
    pub amount: i64,

    /// Total refunded so far.
    #[serde(default)]
    pub refund_amount: i64,

    pub currency: Currency,
    pub statement: String,
    pub email: String,
    pub created: i64,
}

impl Charge {
    /// Amount still available for refunds.
    pub fn refundable(&self) -> i64 {
        self.amount - self.refund_amount
    }
}

/// Money returned against a charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refund {
    pub id: String,
    pub charge_id: String,
    pub amount: i64,
    pub currency: Currency,
    pub reason: String,
    pub created: i64,
}
