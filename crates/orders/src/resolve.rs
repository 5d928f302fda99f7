//! Order item resolution.

use std::collections::HashMap;

use domain::OrderItem;
use futures_util::future::join_all;
use inventory::SkuService;
use store::Store;

use crate::{OrderServiceError, Result};

/// Normalizes quantities and folds duplicate SKU lines together.
///
/// Every quantity `<= 0` becomes 1. SKU lines sharing a parent are merged
/// into the first one, adding quantities. First-occurrence order is kept.
/// Fails with `InvalidInput` if a merged quantity overflows.
pub fn merge_items(items: Vec<OrderItem>) -> Result<Vec<OrderItem>> {
    let mut merged: Vec<OrderItem> = Vec::with_capacity(items.len());
    let mut by_parent: HashMap<String, usize> = HashMap::new();

    for mut item in items {
        item.quantity = item.effective_quantity();

        if item.is_sku()
            && let Some(parent) = item.parent.as_ref()
        {
            if let Some(&index) = by_parent.get(parent) {
                let line = &mut merged[index];
                line.quantity = line.quantity.checked_add(item.quantity).ok_or_else(|| {
                    OrderServiceError::InvalidInput(format!("quantity overflow for sku {parent}"))
                })?;
                continue;
            }
            by_parent.insert(parent.clone(), merged.len());
        }

        merged.push(item);
    }

    Ok(merged)
}

/// Merges and prices raw order items.
///
/// SKU lines are looked up concurrently and take their amount, currency and
/// description from the SKU, whatever the caller sent. Other lines keep
/// their amount and get a default description when they have none. If any
/// lookup fails, the error of the earliest failing line is returned.
pub async fn resolve_items<S>(skus: &SkuService<S>, items: Vec<OrderItem>) -> Result<Vec<OrderItem>>
where
    S: Store + Clone,
{
    let mut items = merge_items(items)?;

    let lookups = join_all(items.iter().map(|item| async move {
        match (item.is_sku(), item.parent.as_deref()) {
            (true, Some(parent)) => Some(skus.get(parent).await),
            (true, None) => Some(skus.get("").await),
            (false, _) => None,
        }
    }))
    .await;

    for (item, lookup) in items.iter_mut().zip(lookups) {
        match lookup {
            Some(Ok(sku)) => {
                item.amount = sku.price;
                item.currency = sku.currency;
                item.description = sku.name;
            }
            Some(Err(err)) => return Err(err.into()),
            None => {
                if item.description.is_empty()
                    && let Some(description) = item.kind.default_description()
                {
                    item.description = description.to_string();
                }
            }
        }
    }

    Ok(items)
}
