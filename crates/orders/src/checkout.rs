//! Pay: lock, check stock, charge, persist, commit inventory.

use std::time::Instant;

use common::unix_now;
use domain::{Charge, Order};
use payment::{Card, ChargeRequest, RefundRequest};
use store::{Store, StoreError, StoreExt};
use tracing::Instrument;

use crate::locks::{LockedLine, lock_sku_lines, release_lines};
use crate::service::release_order;
use crate::{OrderService, OrderServiceError, Result, validate};

impl<S: Store + Clone + 'static> OrderService<S> {
    /// Charges `card` for the order and marks it paid.
    ///
    /// Holds the order lock for the whole flow and every SKU lock from the
    /// stock check until inventory is committed. No charge is made unless
    /// every finite SKU has enough stock. If the paid order cannot be
    /// stored, the charge is refunded and `DataLoss` is returned.
    ///
    /// Once validated, the flow runs on its own task and completes even if
    /// the returned future is dropped.
    #[tracing::instrument(skip(self, card))]
    pub async fn pay(&self, order_id: &str, card: Card) -> Result<Order> {
        validate::object_id("order", order_id)?;
        validate::card(&card)?;

        let service = self.clone();
        let order_id = order_id.to_string();
        tokio::spawn(async move { service.pay_detached(&order_id, card).await }.in_current_span())
            .await
            .map_err(|err| OrderServiceError::Internal(format!("pay task failed: {err}")))?
    }

    async fn pay_detached(&self, order_id: &str, card: Card) -> Result<Order> {
        let started = Instant::now();
        let mut guard = self.try_lock_order(order_id).await?;
        let result = self.pay_locked(order_id, card).await;
        release_order(&mut guard).await;

        match &result {
            Ok(order) => {
                metrics::counter!("orders_paid_total").increment(1);
                metrics::histogram!("orders_pay_duration_seconds")
                    .record(started.elapsed().as_secs_f64());
                tracing::info!(order_id = %order.id, amount = order.amount, "order paid");
            }
            Err(err) => {
                metrics::counter!("orders_pay_failures_total", "kind" => err.kind().as_str())
                    .increment(1);
                tracing::warn!(%order_id, error = %err, "payment failed");
            }
        }
        result
    }

    async fn pay_locked(&self, order_id: &str, card: Card) -> Result<Order> {
        let mut order: Order = self.store.one(order_id).await?;
        order.is_payable(unix_now())?;

        let mut lines = lock_sku_lines(&self.skus, &order).await?;
        let result = self.charge_and_commit(&mut order, &mut lines, card).await;
        release_lines(&mut lines).await;

        result.map(|()| order)
    }

    async fn charge_and_commit(
        &self,
        order: &mut Order,
        lines: &mut [LockedLine<S>],
        card: Card,
    ) -> Result<()> {
        for line in lines.iter() {
            let inventory = line.sku.sku().inventory;
            if !inventory.can_sell(line.quantity) {
                return Err(OrderServiceError::Oversell {
                    sku_id: line.sku.sku().id.clone(),
                    available: inventory.quantity,
                    requested: line.quantity,
                });
            }
        }

        let charge = self
            .provider
            .charge(ChargeRequest {
                provider: self.provider.id(),
                card,
                amount: order.amount,
                currency: order.currency,
                email: order.email.clone(),
                statement: format!("Order #{}", order.id),
            })
            .await?;

        order.mark_paid(&charge.id);
        if let Err(err) = self.persist(order).await {
            return Err(self.refund_unrecorded_charge(order, &charge, err).await);
        }

        // Inventory commits are best-effort once the order is recorded as paid.
        for line in lines.iter_mut() {
            if !line.sku.sku().inventory.is_finite() {
                continue;
            }
            let committed = match line.sku.sku_mut().decrement(line.quantity) {
                Ok(()) => line.sku.commit().await.map_err(|err| err.to_string()),
                Err(err) => Err(err.to_string()),
            };
            if let Err(err) = committed {
                metrics::counter!("inventory_commit_failures_total").increment(1);
                tracing::error!(
                    order_id = %order.id,
                    sku_id = %line.sku.sku().id,
                    quantity = line.quantity,
                    error = %err,
                    "inventory decrement not committed for paid order"
                );
            }
        }

        Ok(())
    }

    /// Refunds a charge whose order could not be stored.
    ///
    /// Attempted exactly once. Either way the caller gets `DataLoss`.
    async fn refund_unrecorded_charge(
        &self,
        order: &Order,
        charge: &Charge,
        cause: StoreError,
    ) -> OrderServiceError {
        metrics::counter!("compensation_refunds_total").increment(1);
        tracing::error!(
            order_id = %order.id,
            charge_id = %charge.id,
            error = %cause,
            "paid order not persisted, refunding charge"
        );

        let refund = self
            .provider
            .refund(RefundRequest {
                charge_id: charge.id.clone(),
                amount: charge.amount,
                currency: charge.currency,
                reason: "order_not_recorded".to_string(),
            })
            .await;

        let refund_id = match refund {
            Ok(refund) => Some(refund.id),
            Err(err) => {
                metrics::counter!("data_loss_total", "stage" => "pay").increment(1);
                tracing::error!(
                    order_id = %order.id,
                    charge_id = %charge.id,
                    error = %err,
                    "compensating refund failed, manual reconciliation required"
                );
                None
            }
        };

        OrderServiceError::DataLoss {
            order_id: order.id.clone(),
            charge_id: Some(charge.id.clone()),
            refund_id,
        }
    }
}
