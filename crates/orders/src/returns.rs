//! Return: lock, refund the order total, restock when unshipped, persist.

use domain::{Order, calculate_total};
use payment::RefundRequest;
use store::{Store, StoreExt};
use tracing::Instrument;

use crate::locks::{LockedLine, lock_sku_lines, release_lines};
use crate::service::release_order;
use crate::{OrderService, OrderServiceError, Result, validate};

impl<S: Store + Clone + 'static> OrderService<S> {
    /// Refunds an order in full.
    ///
    /// A paid order becomes `Canceled` and its finite SKUs are restocked.
    /// A fulfilled order becomes `Returned` without restocking. Waits as
    /// long as needed for the order lock.
    ///
    /// Once validated, the flow runs on its own task and completes even if
    /// the returned future is dropped.
    #[tracing::instrument(skip(self))]
    pub async fn return_order(&self, order_id: &str) -> Result<Order> {
        validate::object_id("order", order_id)?;

        let service = self.clone();
        let order_id = order_id.to_string();
        tokio::spawn(async move { service.return_detached(&order_id).await }.in_current_span())
            .await
            .map_err(|err| OrderServiceError::Internal(format!("return task failed: {err}")))?
    }

    async fn return_detached(&self, order_id: &str) -> Result<Order> {
        let mut guard = self.lock_order(order_id).await?;
        let result = self.return_locked(order_id).await;
        release_order(&mut guard).await;

        match &result {
            Ok(order) => {
                metrics::counter!("orders_returned_total", "status" => order.status.as_str())
                    .increment(1);
                tracing::info!(order_id = %order.id, status = %order.status, "order refunded");
            }
            Err(err) => {
                tracing::warn!(%order_id, error = %err, "return failed");
            }
        }
        result
    }

    async fn return_locked(&self, order_id: &str) -> Result<Order> {
        let mut order: Order = self.store.one(order_id).await?;

        let amount = calculate_total(order.currency, &order.items)?;
        order.is_returnable(amount)?;

        let charge_id = order.charge_id.clone().ok_or_else(|| {
            OrderServiceError::Internal(format!("order {} has no charge to refund", order.id))
        })?;

        let mut lines = lock_sku_lines(&self.skus, &order).await?;
        let result = self
            .refund_and_restock(&mut order, &mut lines, charge_id, amount)
            .await;
        release_lines(&mut lines).await;

        result.map(|()| order)
    }

    async fn refund_and_restock(
        &self,
        order: &mut Order,
        lines: &mut [LockedLine<S>],
        charge_id: String,
        amount: i64,
    ) -> Result<()> {
        let refund = self
            .provider
            .refund(RefundRequest {
                charge_id: charge_id.clone(),
                amount,
                currency: order.currency,
                reason: "requested_by_customer".to_string(),
            })
            .await?;

        let prior = order.status;
        match prior.after_return() {
            Some(next) => order.status = next,
            None => tracing::warn!(
                order_id = %order.id,
                status = %prior,
                refund_id = %refund.id,
                "refund issued for an order with no return transition"
            ),
        }

        if prior.restocks_on_return() {
            for line in lines.iter_mut() {
                if !line.sku.sku().inventory.is_finite() {
                    continue;
                }
                let committed = match line.sku.sku_mut().restock(line.quantity) {
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
                        "inventory restock not committed for returned order"
                    );
                }
            }
        }

        if let Err(err) = self.persist(order).await {
            metrics::counter!("data_loss_total", "stage" => "return").increment(1);
            tracing::error!(
                order_id = %order.id,
                refund_id = %refund.id,
                error = %err,
                "refunded order not persisted, manual reconciliation required"
            );
            return Err(OrderServiceError::DataLoss {
                order_id: order.id.clone(),
                charge_id: Some(charge_id),
                refund_id: Some(refund.id),
            });
        }

        Ok(())
    }
}
