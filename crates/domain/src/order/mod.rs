//! Order entity, line items, state machine and totals.

mod entity;
mod item;
mod state;
mod total;

pub use entity::{Address, Order, PAYABLE_TTL_SECS, Shipping};
pub use item::{ItemKind, OrderItem};
pub use state::OrderStatus;
pub use total::calculate_total;

use thiserror::Error;

use crate::Currency;

/// Errors raised by order preconditions and transitions.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Order is not in a status that accepts payment.
    #[error("order is not payable in {status} status")]
    NotPayable { status: OrderStatus },

    /// The payment window has passed.
    #[error("order expired: created {age_secs}s ago, payable for {ttl_secs}s")]
    Expired { age_secs: i64, ttl_secs: i64 },

    #[error("order amount must be positive, got {amount}")]
    NonPositiveAmount { amount: i64 },

    /// Order is not in a status that accepts a refund.
    #[error("order is not returnable in {status} status")]
    NotReturnable { status: OrderStatus },

    #[error("refund of {requested} exceeds order amount {amount}")]
    RefundExceedsAmount { requested: i64, amount: i64 },

    /// An item is priced in a currency other than the order's.
    #[error("currency mismatch: order is {expected}, item is {found}")]
    CurrencyMismatch { expected: Currency, found: Currency },

    #[error("order total overflows")]
    AmountOverflow,

    #[error("invalid state transition: cannot {action} from {from} status")]
    InvalidTransition {
        from: OrderStatus,
        action: &'static str,
    },
}
