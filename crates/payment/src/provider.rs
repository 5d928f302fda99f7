use async_trait::async_trait;
use domain::{Charge, Currency, ProviderId, Refund};

use crate::{Card, Result};

/// A charge to capture.
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub provider: ProviderId,
    pub card: Card,
    /// Minor units.
    pub amount: i64,
    pub currency: Currency,
    pub email: String,
    /// Text shown on the customer's statement.
    pub statement: String,
}

/// A refund against an existing charge.
#[derive(Debug, Clone)]
pub struct RefundRequest {
    pub charge_id: String,
    pub amount: i64,
    pub currency: Currency,
    pub reason: String,
}

/// Trait for payment provider operations.
///
/// Charging is not idempotent; callers must not blindly retry `charge`.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Which provider this is.
    fn id(&self) -> ProviderId;

    /// Captures a payment.
    async fn charge(&self, request: ChargeRequest) -> Result<Charge>;

    /// Returns money against a previous charge.
    async fn refund(&self, request: RefundRequest) -> Result<Refund>;
}
