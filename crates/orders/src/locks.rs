//! Concurrent locking of an order's SKU lines.

use std::time::Duration;

use domain::Order;
use futures_util::future::join_all;
use inventory::{LockedSku, SkuService};
use store::Store;

use crate::Result;

/// How long each SKU line waits for its lock.
pub(crate) const ITEM_LOCK_TIMEOUT: Duration = Duration::from_secs(1);

/// A locked SKU together with the quantity the order line asks for.
pub(crate) struct LockedLine<S> {
    pub sku: LockedSku<S>,
    pub quantity: i64,
}

/// Locks and reads every SKU line of `order`, one task per line.
///
/// All acquisitions run to completion before anything is decided. If any
/// line failed, the locks that were taken are released and the error of the
/// earliest failing line is returned.
pub(crate) async fn lock_sku_lines<S>(
    skus: &SkuService<S>,
    order: &Order,
) -> Result<Vec<LockedLine<S>>>
where
    S: Store + Clone,
{
    let attempts = join_all(order.sku_items().map(|item| async move {
        let sku_id = item.parent.as_deref().unwrap_or_default();
        skus.get_with_inventory_lock(sku_id, ITEM_LOCK_TIMEOUT)
            .await
            .map(|sku| LockedLine {
                sku,
                quantity: item.quantity,
            })
    }))
    .await;

    let mut lines = Vec::with_capacity(attempts.len());
    let mut first_error = None;
    for attempt in attempts {
        match attempt {
            Ok(line) => lines.push(line),
            Err(err) => {
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }

    match first_error {
        Some(err) => {
            release_lines(&mut lines).await;
            Err(err.into())
        }
        None => Ok(lines),
    }
}

/// Releases every line lock, logging failures.
pub(crate) async fn release_lines<S: Store>(lines: &mut [LockedLine<S>]) {
    for line in lines.iter_mut() {
        if let Err(err) = line.sku.release().await {
            tracing::warn!(sku_id = %line.sku.sku().id, error = %err, "failed to release sku lock");
        }
    }
}
