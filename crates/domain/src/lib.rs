//! Domain layer for the order service.
//!
//! This crate provides the entities the checkout flows operate on:
//! - Order entity with its status machine and payability rules
//! - Order line items and total calculation
//! - SKUs with finite or infinite inventory
//! - Money, currencies and payment provider receipts

pub mod charge;
pub mod order;
pub mod sku;
pub mod value_objects;

pub use charge::{Charge, ProviderId, Refund};
pub use order::{
    Address, ItemKind, Order, OrderError, OrderItem, OrderStatus, PAYABLE_TTL_SECS, Shipping,
    calculate_total,
};
pub use sku::{Inventory, InventoryKind, Sku, StockError};
pub use value_objects::{Currency, Money, MoneyError};
