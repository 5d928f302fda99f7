//! Integration tests for locked inventory access.
//!
//! These tests verify that concurrent read-modify-commit cycles on one SKU
//! are serialized by its lock.

use std::sync::Arc;
use std::time::Duration;

use domain::{Currency, Inventory};
use inventory::{NewSku, SkuService};
use locker::MemoryLocker;
use store::InMemoryStore;

fn service() -> SkuService<InMemoryStore> {
    SkuService::new(InMemoryStore::new(), Arc::new(MemoryLocker::new()))
}

#[tokio::test]
async fn concurrent_decrements_do_not_lose_updates() {
    let service = service();
    let sku = service
        .create(NewSku {
            name: "Mug".to_string(),
            price: 900,
            currency: Currency::Usd,
            inventory: Inventory::finite(100),
        })
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..20 {
        let service = service.clone();
        let sku_id = sku.id.clone();
        handles.push(tokio::spawn(async move {
            let mut locked = service
                .get_with_inventory_lock(&sku_id, Duration::from_secs(5))
                .await
                .unwrap();
            locked.sku_mut().decrement(1).unwrap();
            tokio::task::yield_now().await;
            locked.commit().await.unwrap();
            locked.release().await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let sku = service.get(&sku.id).await.unwrap();
    assert_eq!(sku.inventory.quantity, 80);
}

#[tokio::test]
async fn different_skus_lock_independently() {
    let service = service();
    let new = |name: &str| NewSku {
        name: name.to_string(),
        price: 100,
        currency: Currency::Eur,
        inventory: Inventory::infinite(),
    };
    let a = service.create(new("A")).await.unwrap();
    let b = service.create(new("B")).await.unwrap();

    let _a = service
        .get_with_inventory_lock(&a.id, Duration::from_secs(1))
        .await
        .unwrap();
    let b_locked = service
        .get_with_inventory_lock(&b.id, Duration::from_millis(50))
        .await
        .unwrap();
    assert_eq!(b_locked.sku().name, "B");
}
