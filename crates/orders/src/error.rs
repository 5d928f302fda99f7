//! Order service error types.

use domain::OrderError;
use inventory::InventoryError;
use locker::LockError;
use payment::PaymentError;
use store::StoreError;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderServiceError {
    /// Request failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A referenced object does not exist.
    #[error("{namespace} not found: {id}")]
    NotFound { namespace: String, id: String },

    /// An object lock could not be taken.
    #[error("lock error: {0}")]
    Lock(#[from] LockError),

    /// The order is not in a state that allows the operation.
    #[error("precondition failed: {0}")]
    Precondition(#[from] OrderError),

    /// A finite SKU does not have enough stock.
    #[error("oversell on sku {sku_id}: {available} available, {requested} requested")]
    Oversell {
        sku_id: String,
        available: i64,
        requested: i64,
    },

    /// The payment provider rejected the charge or refund.
    #[error("payment error: {0}")]
    Provider(#[from] PaymentError),

    /// The order could not be persisted after money moved.
    ///
    /// Carries every id an operator needs to reconcile by hand.
    #[error("data loss on order {order_id}: {}", describe_money_trail(.charge_id, .refund_id))]
    DataLoss {
        order_id: String,
        charge_id: Option<String>,
        refund_id: Option<String>,
    },

    /// Storage or another dependency failed.
    #[error("internal error: {0}")]
    Internal(String),

    /// The service is misconfigured.
    #[error("fatal configuration error: {0}")]
    Fatal(String),
}

fn describe_money_trail(charge_id: &Option<String>, refund_id: &Option<String>) -> String {
    match (charge_id, refund_id) {
        (Some(charge), Some(refund)) => format!("charge {charge} refunded by {refund}"),
        (Some(charge), None) => format!("charge {charge} was not refunded"),
        (None, Some(refund)) => format!("refund {refund} was issued"),
        (None, None) => "no payment recorded".to_string(),
    }
}

/// Coarse error classes, used to pick response codes and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    LockTimeout,
    PreconditionFailed,
    Provider,
    DataLoss,
    Internal,
    Fatal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::NotFound => "not_found",
            ErrorKind::LockTimeout => "lock_timeout",
            ErrorKind::PreconditionFailed => "precondition_failed",
            ErrorKind::Provider => "provider",
            ErrorKind::DataLoss => "data_loss",
            ErrorKind::Internal => "internal",
            ErrorKind::Fatal => "fatal",
        }
    }
}

impl OrderServiceError {
    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrderServiceError::InvalidInput(_) => ErrorKind::InvalidInput,
            OrderServiceError::NotFound { .. } => ErrorKind::NotFound,
            OrderServiceError::Lock(LockError::Timeout { .. }) => ErrorKind::LockTimeout,
            OrderServiceError::Lock(LockError::MissingInformation { .. }) => {
                ErrorKind::InvalidInput
            }
            OrderServiceError::Lock(_) => ErrorKind::Internal,
            OrderServiceError::Precondition(_) | OrderServiceError::Oversell { .. } => {
                ErrorKind::PreconditionFailed
            }
            OrderServiceError::Provider(PaymentError::UnregisteredProvider(_)) => ErrorKind::Fatal,
            OrderServiceError::Provider(PaymentError::ChargeNotFound(_)) => ErrorKind::NotFound,
            OrderServiceError::Provider(err) if err.is_precondition() => {
                ErrorKind::PreconditionFailed
            }
            OrderServiceError::Provider(_) => ErrorKind::Provider,
            OrderServiceError::DataLoss { .. } => ErrorKind::DataLoss,
            OrderServiceError::Internal(_) => ErrorKind::Internal,
            OrderServiceError::Fatal(_) => ErrorKind::Fatal,
        }
    }
}

impl From<StoreError> for OrderServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { namespace, id } => OrderServiceError::NotFound { namespace, id },
            other => OrderServiceError::Internal(other.to_string()),
        }
    }
}

impl From<InventoryError> for OrderServiceError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::InvalidInput(msg) => OrderServiceError::InvalidInput(msg),
            InventoryError::NotFound(id) => OrderServiceError::NotFound {
                namespace: domain::Sku::NAMESPACE.to_string(),
                id,
            },
            InventoryError::Lock(err) => OrderServiceError::Lock(err),
            InventoryError::Store(err) => OrderServiceError::Internal(err.to_string()),
        }
    }
}

/// Convenience type alias for order service results.
pub type Result<T> = std::result::Result<T, OrderServiceError>;
