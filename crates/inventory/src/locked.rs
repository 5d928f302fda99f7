use domain::Sku;
use locker::{LockGuard, LockResult};
use store::{Store, StoreExt};

use crate::{InventoryError, Result};

/// A SKU snapshot read while its lock is held.
///
/// Mutate it through [`LockedSku::sku_mut`] and persist with
/// [`LockedSku::commit`]. The lock is held until [`LockedSku::release`] is
/// called or the value is dropped.
#[derive(Debug)]
pub struct LockedSku<S> {
    sku: Sku,
    guard: LockGuard,
    store: S,
}

impl<S: Store> LockedSku<S> {
    pub(crate) fn new(sku: Sku, guard: LockGuard, store: S) -> Self {
        Self { sku, guard, store }
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn sku_mut(&mut self) -> &mut Sku {
        &mut self.sku
    }

    /// Persists the snapshot as it is now.
    pub async fn commit(&mut self) -> Result<()> {
        let sku_id = self.sku.id.clone();
        self.store
            .update(&mut self.sku)
            .await
            .map_err(|err| InventoryError::from_store(err, &sku_id))
    }

    /// Releases the SKU lock. Idempotent.
    pub async fn release(&mut self) -> LockResult<()> {
        self.guard.release().await
    }

    /// Returns true while the SKU lock is held.
    pub fn is_locked(&self) -> bool {
        self.guard.is_held()
    }
}
