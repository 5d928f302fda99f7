//! Inventory error types.

use locker::LockError;
use store::StoreError;
use thiserror::Error;

/// Errors that can occur during SKU operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Request failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// SKU does not exist.
    #[error("sku not found: {0}")]
    NotFound(String),

    /// The SKU lock could not be taken.
    #[error("lock error: {0}")]
    Lock(#[from] LockError),

    /// Storage failed for a reason other than a missing record.
    #[error("store error: {0}")]
    Store(StoreError),
}

impl InventoryError {
    /// Maps a store error, keeping not-found distinct.
    pub(crate) fn from_store(err: StoreError, sku_id: &str) -> Self {
        if err.is_not_found() {
            InventoryError::NotFound(sku_id.to_string())
        } else {
            InventoryError::Store(err)
        }
    }
}

/// Convenience type alias for inventory results.
pub type Result<T> = std::result::Result<T, InventoryError>;
