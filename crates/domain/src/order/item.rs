//! Order line items.

use serde::{Deserialize, Serialize};

use crate::Currency;

/// Line item kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Sku,
    Discount,
    Shipping,
    Tax,
}

impl ItemKind {
    /// Description given to non-SKU items that arrive without one.
    pub fn default_description(&self) -> Option<&'static str> {
        match self {
            ItemKind::Sku => None,
            ItemKind::Discount => Some("Discount"),
            ItemKind::Shipping => Some("Shipping"),
            ItemKind::Tax => Some("Tax"),
        }
    }
}

/// A line item in an order.
///
/// For `Sku` items `amount`, `currency` and `description` come from the SKU
/// record during resolution; whatever the caller sent is overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(rename = "type")]
    pub kind: ItemKind,

    /// SKU id, only for `Sku` items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(default)]
    pub quantity: i64,

    /// Unit amount in minor units; negative for discounts.
    #[serde(default)]
    pub amount: i64,

    pub currency: Currency,

    #[serde(default)]
    pub description: String,
}

impl OrderItem {
    /// A SKU line; price and description are filled in on resolution.
    pub fn sku(parent: impl Into<String>, quantity: i64, currency: Currency) -> Self {
        Self {
            kind: ItemKind::Sku,
            parent: Some(parent.into()),
            quantity,
            amount: 0,
            currency,
            description: String::new(),
        }
    }

    /// A discount line. `amount` is the (negative) unit amount.
    pub fn discount(amount: i64, currency: Currency) -> Self {
        Self::adjustment(ItemKind::Discount, amount, currency)
    }

    pub fn shipping(amount: i64, currency: Currency) -> Self {
        Self::adjustment(ItemKind::Shipping, amount, currency)
    }

    pub fn tax(amount: i64, currency: Currency) -> Self {
        Self::adjustment(ItemKind::Tax, amount, currency)
    }

    fn adjustment(kind: ItemKind, amount: i64, currency: Currency) -> Self {
        Self {
            kind,
            parent: None,
            quantity: 1,
            amount,
            currency,
            description: String::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_sku(&self) -> bool {
        self.kind == ItemKind::Sku
    }

    /// Quantity with non-positive values read as 1.
    pub fn effective_quantity(&self) -> i64 {
        if self.quantity <= 0 { 1 } else { self.quantity }
    }
}
