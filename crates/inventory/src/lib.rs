//! SKU records and locked access to their inventory.
//!
//! [`SkuService::get_with_inventory_lock`] is the only way checkout touches
//! stock: it locks the SKU, reads it, and hands back a [`LockedSku`] that
//! can persist changes made while the lock is held.

pub mod error;
pub mod locked;
pub mod service;

pub use error::{InventoryError, Result};
pub use locked::LockedSku;
pub use service::{NewSku, SkuService};
