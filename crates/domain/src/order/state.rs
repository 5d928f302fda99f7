//! Order state machine.

use serde::{Deserialize, Serialize};

/// The status of an order in its lifecycle.
///
/// State transitions:
/// ```text
/// Created ──► Paid ──┬──► Canceled
///                    └──► Fulfilled ──► Returned
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order exists and awaits payment.
    #[default]
    Created,

    /// Payment captured, inventory decremented.
    Paid,

    /// Goods have shipped.
    Fulfilled,

    /// Refunded before fulfillment (terminal state).
    Canceled,

    /// Refunded after fulfillment (terminal state).
    Returned,
}

impl OrderStatus {
    /// Returns true if the order can be paid in this state.
    pub fn can_pay(&self) -> bool {
        matches!(self, OrderStatus::Created)
    }

    /// Returns true if the order can be fulfilled in this state.
    pub fn can_fulfill(&self) -> bool {
        matches!(self, OrderStatus::Paid)
    }

    /// Returns true if a refund may be requested in this state.
    pub fn can_return(&self) -> bool {
        matches!(
            self,
            OrderStatus::Paid | OrderStatus::Fulfilled | OrderStatus::Canceled
        )
    }

    /// The status a return moves the order to, if any.
    ///
    /// Canceled orders can still be refunded but have no further status to
    /// move to.
    pub fn after_return(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Paid => Some(OrderStatus::Canceled),
            OrderStatus::Fulfilled => Some(OrderStatus::Returned),
            _ => None,
        }
    }

    /// Returns true if a return from this state puts goods back on the shelf.
    pub fn restocks_on_return(&self) -> bool {
        matches!(self, OrderStatus::Paid)
    }

    /// Returns true if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Canceled | OrderStatus::Returned)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Paid => "paid",
            OrderStatus::Fulfilled => "fulfilled",
            OrderStatus::Canceled => "canceled",
            OrderStatus::Returned => "returned",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
