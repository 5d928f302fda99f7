//! Integration tests for the order entity.
//!
//! These tests walk orders through their lifecycle and verify they survive a
//! round trip through the document store unchanged.

use domain::{
    Currency, Inventory, ItemKind, Order, OrderError, OrderItem, OrderStatus, PAYABLE_TTL_SECS,
    Shipping, Sku, calculate_total,
};
use store::{InMemoryStore, ListOptions, StoreExt};

fn checkout_items() -> Vec<OrderItem> {
    let mut sku = OrderItem::sku("5f0c5a36-6d6e-4e53-9b8a-0a0f6b1c2d3e", 2, Currency::Usd)
        .with_description("Tee");
    sku.amount = 1500;
    vec![
        sku,
        OrderItem::discount(-1000, Currency::Usd).with_description("Discount"),
        OrderItem::tax(50, Currency::Usd).with_description("Tax"),
    ]
}

fn priced_order(created: i64) -> Order {
    let items = checkout_items();
    let mut order = Order::new("buyer@example.com", Currency::Usd, items, Shipping::default());
    order.amount = calculate_total(order.currency, &order.items).unwrap();
    order.created = created;
    order
}

mod order_lifecycle {
    use super::*;

    #[test]
    fn paid_then_canceled() {
        let mut order = priced_order(1_000);
        assert_eq!(order.amount, 2050);
        order.is_payable(1_030).unwrap();

        order.mark_paid("ch_1");
        order.is_returnable(order.amount).unwrap();
        order.status = order.status.after_return().unwrap();

        assert_eq!(order.status, OrderStatus::Canceled);
        assert!(order.status.is_terminal());
    }

    #[test]
    fn paid_fulfilled_then_returned() {
        let mut order = priced_order(1_000);
        order.mark_paid("ch_1");
        order.fulfill().unwrap();

        assert!(!order.status.restocks_on_return());
        order.status = order.status.after_return().unwrap();
        assert_eq!(order.status, OrderStatus::Returned);
        assert!(order.is_returnable(1).is_err());
    }

    #[test]
    fn paid_order_cannot_be_paid_again() {
        let mut order = priced_order(1_000);
        order.mark_paid("ch_1");
        assert!(matches!(
            order.is_payable(1_001),
            Err(OrderError::NotPayable { .. })
        ));
    }

    #[test]
    fn expired_order_is_rejected() {
        let order = priced_order(1_000);
        assert!(matches!(
            order.is_payable(1_000 + PAYABLE_TTL_SECS),
            Err(OrderError::Expired { .. })
        ));
    }
}

mod persistence {
    use super::*;

    #[tokio::test]
    async fn order_round_trips_through_store() {
        let store = InMemoryStore::new();
        let mut order = priced_order(0);

        store.insert(&mut order).await.unwrap();
        assert!(!order.id.is_empty());
        assert!(order.created > 0);

        let loaded: Order = store.one(&order.id).await.unwrap();
        assert_eq!(loaded, order);
        assert_eq!(loaded.items[0].kind, ItemKind::Sku);
        assert_eq!(loaded.items[0].quantity, 2);
    }

    #[tokio::test]
    async fn orders_and_skus_are_listed_separately() {
        let store = InMemoryStore::new();

        let mut sku = Sku::new("Tee", 1500, Currency::Usd, Inventory::finite(3));
        store.insert(&mut sku).await.unwrap();
        for _ in 0..3 {
            store.insert(&mut priced_order(0)).await.unwrap();
        }

        let orders: Vec<Order> = store.list(&ListOptions::default()).await.unwrap();
        let skus: Vec<Sku> = store.list(&ListOptions::default()).await.unwrap();
        assert_eq!(orders.len(), 3);
        assert_eq!(skus.len(), 1);
    }

    #[tokio::test]
    async fn updated_status_is_persisted() {
        let store = InMemoryStore::new();
        let mut order = priced_order(0);
        store.insert(&mut order).await.unwrap();

        order.mark_paid("ch_9");
        store.update(&mut order).await.unwrap();

        let loaded: Order = store.one(&order.id).await.unwrap();
        assert_eq!(loaded.status, OrderStatus::Paid);
        assert_eq!(loaded.charge_id.as_deref(), Some("ch_9"));
    }
}
