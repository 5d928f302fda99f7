//! SKU service.

use std::sync::Arc;
use std::time::Duration;

use common::{ObjectId, ObjectRef};
use domain::{Currency, Inventory, Sku};
use locker::Locker;
use serde::Deserialize;
use store::{ListOptions, Store, StoreExt};

use crate::{InventoryError, LockedSku, Result};

/// Fields accepted when creating a SKU.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSku {
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub inventory: Inventory,
}

/// Service for reading and writing SKUs.
///
/// Inventory changes go through [`SkuService::get_with_inventory_lock`] so
/// that the read-modify-commit of a SKU is serialized across callers.
pub struct SkuService<S> {
    store: S,
    locker: Arc<dyn Locker>,
}

impl<S: Clone> Clone for SkuService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            locker: Arc::clone(&self.locker),
        }
    }
}

impl<S: Store + Clone> SkuService<S> {
    /// Creates a new SKU service.
    pub fn new(store: S, locker: Arc<dyn Locker>) -> Self {
        Self { store, locker }
    }

    /// Creates a SKU.
    #[tracing::instrument(skip(self, new), fields(name = %new.name))]
    pub async fn create(&self, new: NewSku) -> Result<Sku> {
        if new.name.trim().is_empty() {
            return Err(InventoryError::InvalidInput("name is required".to_string()));
        }
        if new.price < 0 {
            return Err(InventoryError::InvalidInput(format!(
                "price must not be negative, got {}",
                new.price
            )));
        }
        if new.inventory.is_finite() && new.inventory.quantity < 0 {
            return Err(InventoryError::InvalidInput(format!(
                "inventory quantity must not be negative, got {}",
                new.inventory.quantity
            )));
        }

        let mut sku = Sku::new(new.name, new.price, new.currency, new.inventory);
        self.store
            .insert(&mut sku)
            .await
            .map_err(InventoryError::Store)?;

        tracing::info!(sku_id = %sku.id, "sku created");
        Ok(sku)
    }

    /// Loads a SKU.
    pub async fn get(&self, sku_id: &str) -> Result<Sku> {
        validate_id(sku_id)?;
        self.store
            .one(sku_id)
            .await
            .map_err(|err| InventoryError::from_store(err, sku_id))
    }

    /// Lists one page of SKUs.
    pub async fn list(&self, options: ListOptions) -> Result<Vec<Sku>> {
        self.store
            .list(&options)
            .await
            .map_err(InventoryError::Store)
    }

    /// Locks a SKU and reads it.
    ///
    /// Waits at most `timeout` for the lock. On success the caller owns the
    /// lock through the returned [`LockedSku`]; on failure nothing is held.
    #[tracing::instrument(skip(self))]
    pub async fn get_with_inventory_lock(
        &self,
        sku_id: &str,
        timeout: Duration,
    ) -> Result<LockedSku<S>> {
        validate_id(sku_id)?;

        let target = ObjectRef::new(Sku::NAMESPACE, sku_id);
        let guard = self.locker.try_lock(&target, timeout).await?;

        // Dropping the guard on the error path releases the lock.
        let sku: Sku = self
            .store
            .one(sku_id)
            .await
            .map_err(|err| InventoryError::from_store(err, sku_id))?;

        Ok(LockedSku::new(sku, guard, self.store.clone()))
    }
}

fn validate_id(sku_id: &str) -> Result<()> {
    ObjectId::parse(sku_id)
        .map(|_| ())
        .map_err(|_| InventoryError::InvalidInput(format!("invalid sku id: {sku_id:?}")))
}
