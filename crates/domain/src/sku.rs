//! Stock keeping units.

use common::Namespaced;
use serde::{Deserialize, Serialize};
use store::Document;

use thiserror::Error;

use crate::Currency;

/// A rejected stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StockError {
    #[error("stock adjustment must be positive, got {0}")]
    NonPositive(i64),

    #[error("insufficient stock: {available} available, {requested} requested")]
    Insufficient { available: i64, requested: i64 },

    #[error("restocking {0} units overflows the stock count")]
    Overflow(i64),
}

/// Whether a SKU's stock is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InventoryKind {
    /// Stock is tracked and cannot go below zero.
    #[default]
    Finite,

    /// Stock is not tracked.
    Infinite,
}

/// Stock level of a SKU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Inventory {
    #[serde(rename = "type", default)]
    pub kind: InventoryKind,

    #[serde(default)]
    pub quantity: i64,
}

impl Inventory {
    pub fn finite(quantity: i64) -> Self {
        Self {
            kind: InventoryKind::Finite,
            quantity,
        }
    }

    pub fn infinite() -> Self {
        Self {
            kind: InventoryKind::Infinite,
            quantity: 0,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.kind == InventoryKind::Finite
    }

    /// Returns true if `requested` units can be sold.
    pub fn can_sell(&self, requested: i64) -> bool {
        !self.is_finite() || self.quantity >= requested
    }
}

/// A sellable product variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sku {
    #[serde(default)]
    pub id: String,

    pub name: String,

    /// Unit price in minor units.
    pub price: i64,

    pub currency: Currency,

    #[serde(default)]
    pub inventory: Inventory,

    #[serde(default)]
    pub created: i64,

    #[serde(default)]
    pub updated: i64,
}

impl Sku {
    pub const NAMESPACE: &'static str = "sku";

    /// Creates an unsaved SKU.
    pub fn new(name: impl Into<String>, price: i64, currency: Currency, inventory: Inventory) -> Self {
        Self {
            name: name.into(),
            price,
            currency,
            inventory,
            ..Default::default()
        }
    }

    /// Removes sold units from a finite inventory.
    pub fn decrement(&mut self, quantity: i64) -> Result<(), StockError> {
        if quantity <= 0 {
            return Err(StockError::NonPositive(quantity));
        }
        if !self.inventory.is_finite() {
            return Ok(());
        }
        if self.inventory.quantity < quantity {
            return Err(StockError::Insufficient {
                available: self.inventory.quantity,
                requested: quantity,
            });
        }
        self.inventory.quantity -= quantity;
        Ok(())
    }

    /// Puts returned units back into a finite inventory.
    pub fn restock(&mut self, quantity: i64) -> Result<(), StockError> {
        if quantity <= 0 {
            return Err(StockError::NonPositive(quantity));
        }
        if !self.inventory.is_finite() {
            return Ok(());
        }
        self.inventory.quantity = self
            .inventory
            .quantity
            .checked_add(quantity)
            .ok_or(StockError::Overflow(quantity))?;
        Ok(())
    }
}

impl Namespaced for Sku {
    fn namespace(&self) -> &str {
        Self::NAMESPACE
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl Document for Sku {
    const NAMESPACE: &'static str = Sku::NAMESPACE;

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_inventory_limits_sales() {
        let inventory = Inventory::finite(3);
        assert!(inventory.can_sell(3));
        assert!(!inventory.can_sell(4));
    }

    #[test]
    fn test_infinite_inventory_always_sells() {
        let inventory = Inventory::infinite();
        assert!(inventory.can_sell(1_000_000));
    }

    #[test]
    fn test_decrement_and_restock_finite() {
        let mut sku = Sku::new("Tee", 1500, Currency::Usd, Inventory::finite(10));
        sku.decrement(2).unwrap();
        assert_eq!(sku.inventory.quantity, 8);
        sku.restock(2).unwrap();
        assert_eq!(sku.inventory.quantity, 10);
    }

    #[test]
    fn test_infinite_quantity_untouched() {
        let mut sku = Sku::new("Ebook", 900, Currency::Eur, Inventory::infinite());
        sku.decrement(5).unwrap();
        sku.restock(1).unwrap();
        assert_eq!(sku.inventory.quantity, 0);
    }

    #[test]
    fn test_stock_adjustments_are_checked() {
        let mut sku = Sku::new("Tee", 1500, Currency::Usd, Inventory::finite(3));
        assert_eq!(sku.decrement(-5), Err(StockError::NonPositive(-5)));
        assert_eq!(
            sku.decrement(4),
            Err(StockError::Insufficient {
                available: 3,
                requested: 4
            })
        );
        assert_eq!(sku.restock(0), Err(StockError::NonPositive(0)));
        assert_eq!(sku.inventory.quantity, 3);

        sku.inventory.quantity = i64::MAX - 1;
        assert_eq!(sku.restock(2), Err(StockError::Overflow(2)));
        assert_eq!(sku.inventory.quantity, i64::MAX - 1);
    }

    #[test]
    fn test_inventory_json_shape() {
        let sku = Sku::new("Tee", 1500, Currency::Usd, Inventory::finite(3));
        let json = serde_json::to_value(&sku).unwrap();
        assert_eq!(json["inventory"]["type"], "finite");
        assert_eq!(json["inventory"]["quantity"], 3);
        assert_eq!(json["currency"], "USD");
    }
}
