//! Order entity.

use common::Namespaced;
use serde::{Deserialize, Serialize};
use store::Document;

use super::{OrderError, OrderItem, OrderStatus};
use crate::Currency;

/// How long, in seconds, a new order stays payable.
pub const PAYABLE_TTL_SECS: i64 = 120;

/// Postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// Shipping contact for an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shipping {
    pub name: String,
    pub phone: String,
    pub address: Address,
}

/// Order record.
///
/// Represents an order from creation through payment to cancellation or
/// return. The order is mutated in place by the checkout and return flows
/// and re-persisted as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default)]
    pub id: String,

    pub email: String,

    #[serde(default)]
    pub status: OrderStatus,

    /// Total in minor units, equal to the sum of the item lines.
    #[serde(default)]
    pub amount: i64,

    pub currency: Currency,

    #[serde(default)]
    pub items: Vec<OrderItem>,

    #[serde(default)]
    pub shipping: Shipping,

    /// Provider charge backing a paid order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge_id: Option<String>,

    /// Unix seconds.
    #[serde(default)]
    pub created: i64,

    #[serde(default)]
    pub updated: i64,
}

impl Order {
    /// Namespace orders are stored and locked under.
    pub const NAMESPACE: &'static str = "order";

    /// Creates an unsaved order in `Created` status with a zero amount.
    pub fn new(
        email: impl Into<String>,
        currency: Currency,
        items: Vec<OrderItem>,
        shipping: Shipping,
    ) -> Self {
        Self {
            email: email.into(),
            currency,
            items,
            shipping,
            ..Default::default()
        }
    }

    /// Checks that the order can be charged at time `now` (unix seconds).
    ///
    /// Rejects, in order: a status other than `Created`, an order whose age
    /// has reached [`PAYABLE_TTL_SECS`], and a non-positive amount.
    pub fn is_payable(&self, now: i64) -> Result<(), OrderError> {
        if !self.status.can_pay() {
            return Err(OrderError::NotPayable {
                status: self.status,
            });
        }

        let age = now - self.created;
        if age >= PAYABLE_TTL_SECS {
            return Err(OrderError::Expired {
                age_secs: age,
                ttl_secs: PAYABLE_TTL_SECS,
            });
        }

        if self.amount <= 0 {
            return Err(OrderError::NonPositiveAmount {
                amount: self.amount,
            });
        }

        Ok(())
    }

    /// Checks that `requested` may be refunded.
    pub fn is_returnable(&self, requested: i64) -> Result<(), OrderError> {
        if !self.status.can_return() {
            return Err(OrderError::NotReturnable {
                status: self.status,
            });
        }

        if requested > self.amount {
            return Err(OrderError::RefundExceedsAmount {
                requested,
                amount: self.amount,
            });
        }

        Ok(())
    }

    /// Records a successful charge.
    pub fn mark_paid(&mut self, charge_id: impl Into<String>) {
        self.charge_id = Some(charge_id.into());
        self.status = OrderStatus::Paid;
    }

    /// Moves a paid order to `Fulfilled`.
    pub fn fulfill(&mut self) -> Result<(), OrderError> {
        if !self.status.can_fulfill() {
            return Err(OrderError::InvalidTransition {
                from: self.status,
                action: "fulfill",
            });
        }
        self.status = OrderStatus::Fulfilled;
        Ok(())
    }

    /// SKU line items.
    pub fn sku_items(&self) -> impl Iterator<Item = &OrderItem> {
        self.items.iter().filter(|item| item.is_sku())
    }
}

impl Namespaced for Order {
    fn namespace(&self) -> &str {
        Self::NAMESPACE
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl Document for Order {
    const NAMESPACE: &'static str = Order::NAMESPACE;

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn created(&self) -> i64 {
        self.created
    }

    fn set_created(&mut self, created: i64) {
        self.created = created;
    }

    fn set_updated(&mut self, updated: i64) {
        self.updated = updated;
    }
}
