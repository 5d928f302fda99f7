//! Payment error types.

use domain::ProviderId;
use thiserror::Error;

/// Errors returned by payment providers.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The issuer declined the card.
    #[error("card declined: {0}")]
    Declined(String),

    #[error("invalid card security code")]
    InvalidCvc,

    #[error("unsupported card type: {0}")]
    UnsupportedCard(String),

    /// The provider failed for a reason not tied to the card.
    #[error("payment provider error: {0}")]
    Provider(String),

    #[error("charge not found: {0}")]
    ChargeNotFound(String),

    #[error("refund of {requested} exceeds refundable amount {refundable}")]
    RefundExceedsCharge { requested: i64, refundable: i64 },

    /// No provider was registered under this id.
    #[error("payment provider not registered: {0}")]
    UnregisteredProvider(ProviderId),
}

impl PaymentError {
    /// Returns true if the failure is a business-rule rejection rather than
    /// a provider-side failure.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            PaymentError::UnsupportedCard(_) | PaymentError::RefundExceedsCharge { .. }
        )
    }
}

/// Convenience type alias for payment results.
pub type Result<T> = std::result::Result<T, PaymentError>;
