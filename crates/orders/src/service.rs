//! Order service.

use std::sync::Arc;
use std::time::Duration;

use common::ObjectRef;
use domain::{Currency, Order, OrderItem, ProviderId, Shipping, calculate_total};
use inventory::SkuService;
use locker::{LockGuard, Locker};
use payment::{PaymentProvider, ProviderRegistry};
use serde::Deserialize;
use store::{ListOptions, Store, StoreExt};

use crate::{OrderServiceError, Result, RetryPolicy, resolve_items, validate};

/// How long Pay and fulfill wait for the order lock.
pub const ORDER_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Fields accepted when creating an order.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub email: String,
    #[serde(default)]
    pub currency: Currency,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub shipping: Shipping,
}

/// Service for creating, paying for and returning orders.
pub struct OrderService<S> {
    pub(crate) store: S,
    pub(crate) skus: SkuService<S>,
    pub(crate) locker: Arc<dyn Locker>,
    pub(crate) provider: Arc<dyn PaymentProvider>,
    pub(crate) retry: RetryPolicy,
}

impl<S: Clone> Clone for OrderService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            skus: self.skus.clone(),
            locker: Arc::clone(&self.locker),
            provider: Arc::clone(&self.provider),
            retry: self.retry,
        }
    }
}

impl<S: Store + Clone> OrderService<S> {
    /// Creates a new order service charging through `provider_id`.
    ///
    /// Fails with `Fatal` if that provider is not in the registry.
    pub fn new(
        store: S,
        locker: Arc<dyn Locker>,
        registry: &ProviderRegistry,
        provider_id: ProviderId,
    ) -> Result<Self> {
        let provider = registry
            .get(provider_id)
            .map_err(|err| OrderServiceError::Fatal(err.to_string()))?;

        Ok(Self {
            skus: SkuService::new(store.clone(), Arc::clone(&locker)),
            store,
            locker,
            provider,
            retry: RetryPolicy::default(),
        })
    }

    /// Overrides the retry policy for the final persist of each flow.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The SKU service sharing this service's store and locker.
    pub fn skus(&self) -> &SkuService<S> {
        &self.skus
    }

    /// Creates an order from raw line items.
    ///
    /// Items are merged and priced from their SKUs, the total is computed
    /// in the order currency and the order is stored in `Created` status.
    #[tracing::instrument(skip(self, new), fields(email = %new.email))]
    pub async fn new_order(&self, new: NewOrder) -> Result<Order> {
        validate::new_order(&new)?;

        let items = resolve_items(&self.skus, new.items).await?;
        let mut order = Order::new(new.email, new.currency, items, new.shipping);
        order.amount = calculate_total(order.currency, &order.items)?;

        self.store.insert(&mut order).await?;

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = %order.id, amount = order.amount, "order created");
        Ok(order)
    }

    /// Loads an order.
    pub async fn get(&self, order_id: &str) -> Result<Order> {
        validate::object_id("order", order_id)?;
        Ok(self.store.one(order_id).await?)
    }

    /// Lists one page of orders.
    pub async fn list(&self, options: ListOptions) -> Result<Vec<Order>> {
        Ok(self.store.list(&options).await?)
    }

    /// Marks a paid order as shipped.
    #[tracing::instrument(skip(self))]
    pub async fn fulfill(&self, order_id: &str) -> Result<Order> {
        validate::object_id("order", order_id)?;

        let mut guard = self.try_lock_order(order_id).await?;
        let result = self.fulfill_locked(order_id).await;
        release_order(&mut guard).await;

        if let Ok(order) = &result {
            tracing::info!(order_id = %order.id, "order fulfilled");
        }
        result
    }

    async fn fulfill_locked(&self, order_id: &str) -> Result<Order> {
        let mut order: Order = self.store.one(order_id).await?;
        order.fulfill()?;
        self.persist(&mut order)
            .await
            .map_err(|err| OrderServiceError::Internal(err.to_string()))?;
        Ok(order)
    }

    pub(crate) async fn try_lock_order(&self, order_id: &str) -> Result<LockGuard> {
        let target = ObjectRef::new(Order::NAMESPACE, order_id);
        Ok(self.locker.try_lock(&target, ORDER_LOCK_TIMEOUT).await?)
    }

    pub(crate) async fn lock_order(&self, order_id: &str) -> Result<LockGuard> {
        let target = ObjectRef::new(Order::NAMESPACE, order_id);
        Ok(self.locker.lock(&target).await?)
    }

    /// Stores `order` under the retry policy and refreshes it from the
    /// stored copy.
    pub(crate) async fn persist(&self, order: &mut Order) -> store::Result<()> {
        let store = &self.store;
        let snapshot = &*order;

        let saved = self
            .retry
            .run(|| {
                let mut doc = snapshot.clone();
                async move { store.update(&mut doc).await.map(|()| doc) }
            })
            .await?;

        *order = saved;
        Ok(())
    }
}

/// Releases an order lock, logging failures.
pub(crate) async fn release_order(guard: &mut LockGuard) {
    if let Err(err) = guard.release().await {
        tracing::warn!(key = %guard.key(), error = %err, "failed to release order lock");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ObjectId;
    use domain::{Inventory, OrderStatus};
    use inventory::NewSku;
    use locker::MemoryLocker;
    use payment::InMemoryPaymentProvider;
    use store::InMemoryStore;

    fn service() -> OrderService<InMemoryStore> {
        let registry = ProviderRegistry::new().register(Arc::new(InMemoryPaymentProvider::new()));
        OrderService::new(
            InMemoryStore::new(),
            Arc::new(MemoryLocker::new()),
            &registry,
            ProviderId::Sandbox,
        )
        .unwrap()
        .with_retry_policy(RetryPolicy::new(3, Duration::ZERO))
    }

    async fn new_order(service: &OrderService<InMemoryStore>) -> Order {
        let sku = service
            .skus()
            .create(NewSku {
                name: "Tee".to_string(),
                price: 1500,
                currency: Currency::Usd,
                inventory: Inventory::finite(10),
            })
            .await
            .unwrap();

        service
            .new_order(NewOrder {
                email: "buyer@example.com".to_string(),
                currency: Currency::Usd,
                items: vec![
                    OrderItem::sku(&sku.id, 2, Currency::Usd),
                    OrderItem::discount(-1000, Currency::Usd),
                    OrderItem::tax(50, Currency::Usd),
                ],
                shipping: Shipping::default(),
            })
            .await
            .unwrap()
    }

    #[test]
    fn test_unregistered_provider_is_fatal() {
        let result = OrderService::new(
            InMemoryStore::new(),
            Arc::new(MemoryLocker::new()),
            &ProviderRegistry::new(),
            ProviderId::Stripe,
        );
        assert!(matches!(result, Err(OrderServiceError::Fatal(_))));
    }

    #[tokio::test]
    async fn test_new_order_prices_and_stores() {
        let service = service();
        let order = new_order(&service).await;

        assert_eq!(order.status, OrderStatus::Created);
        assert_eq!(order.amount, 2050);
        assert_eq!(order.items[0].description, "Tee");
        assert!(order.created > 0);

        let loaded = service.get(&order.id).await.unwrap();
        assert_eq!(loaded, order);
    }

    #[tokio::test]
    async fn test_new_order_rejects_mixed_currency() {
        let service = service();
        let result = service
            .new_order(NewOrder {
                email: "buyer@example.com".to_string(),
                currency: Currency::Usd,
                items: vec![OrderItem::tax(50, Currency::Eur)],
                shipping: Shipping::default(),
            })
            .await;
        assert!(matches!(
            result,
            Err(OrderServiceError::Precondition(
                domain::OrderError::CurrencyMismatch { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn test_get_missing_and_invalid() {
        let service = service();
        assert!(matches!(
            service.get("nope").await,
            Err(OrderServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            service.get(&ObjectId::new().to_string()).await,
            Err(OrderServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_orders() {
        let service = service();
        new_order(&service).await;
        new_order(&service).await;

        let orders = service.list(ListOptions::default()).await.unwrap();
        assert_eq!(orders.len(), 2);
    }

    #[tokio::test]
    async fn test_fulfill_requires_paid() {
        let service = service();
        let order = new_order(&service).await;

        let result = service.fulfill(&order.id).await;
        assert!(matches!(result, Err(OrderServiceError::Precondition(_))));
    }
}
