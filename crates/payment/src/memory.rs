//! Sandbox payment provider.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::unix_now;
use domain::{Charge, ProviderId, Refund};
use tokio::sync::RwLock;

use crate::{CardBrand, ChargeRequest, PaymentError, PaymentProvider, RefundRequest, Result};

/// Card number the sandbox always declines.
pub const DECLINED_CARD: &str = "4000000000000002";

/// Card number the sandbox rejects with an invalid CVC.
pub const INVALID_CVC_CARD: &str = "4000000000000127";

#[derive(Debug, Default)]
struct State {
    charges: HashMap<String, Charge>,
    refunds: Vec<Refund>,
    next_id: u32,
    fail_on_charge: bool,
    fail_on_refund: bool,
    charge_calls: usize,
    refund_calls: usize,
}

/// In-memory payment provider for development and testing.
///
/// Charges and refunds are kept in memory. Card numbers follow the usual
/// sandbox conventions: [`DECLINED_CARD`] is declined, [`INVALID_CVC_CARD`]
/// fails the CVC check and cards of an unknown network are unsupported.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentProvider {
    state: Arc<RwLock<State>>,
}

impl InMemoryPaymentProvider {
    /// Creates a new sandbox provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the provider to fail every charge call.
    pub async fn set_fail_on_charge(&self, fail: bool) {
        self.state.write().await.fail_on_charge = fail;
    }

    /// Configures the provider to fail every refund call.
    pub async fn set_fail_on_refund(&self, fail: bool) {
        self.state.write().await.fail_on_refund = fail;
    }

    /// Returns the number of captured charges.
    pub async fn charge_count(&self) -> usize {
        self.state.read().await.charges.len()
    }

    /// Returns how many times `charge` was called, including failures.
    pub async fn charge_calls(&self) -> usize {
        self.state.read().await.charge_calls
    }

    /// Returns how many times `refund` was called, including failures.
    pub async fn refund_calls(&self) -> usize {
        self.state.read().await.refund_calls
    }

    /// Returns every successful refund, oldest first.
    pub async fn refunds(&self) -> Vec<Refund> {
        self.state.read().await.refunds.clone()
    }

    /// Looks up a charge by id.
    pub async fn get_charge(&self, charge_id: &str) -> Option<Charge> {
        self.state.read().await.charges.get(charge_id).cloned()
    }
}

#[async_trait]
impl PaymentProvider for InMemoryPaymentProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Sandbox
    }

    async fn charge(&self, request: ChargeRequest) -> Result<Charge> {
        let mut state = self.state.write().await;
        state.charge_calls += 1;

        if state.fail_on_charge {
            return Err(PaymentError::Provider("sandbox charge unavailable".to_string()));
        }

        let card = &request.card;
        if card.brand() == CardBrand::Unknown {
            return Err(PaymentError::UnsupportedCard(card.last4().to_string()));
        }
        if card.number == DECLINED_CARD {
            return Err(PaymentError::Declined("generic_decline".to_string()));
        }
        let cvc_len = if card.brand() == CardBrand::Amex { 4 } else { 3 };
        if card.number == INVALID_CVC_CARD
            || card.cvc.len() != cvc_len
            || !card.cvc.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(PaymentError::InvalidCvc);
        }

        state.next_id += 1;
        let charge = Charge {
            id: format!("ch_{:06}", state.next_id),
            provider: ProviderId::Sandbox,
            amount: request.amount,
            refund_amount: 0,
            currency: request.currency,
            statement: request.statement,
            email: request.email,
            created: unix_now(),
        };
        state.charges.insert(charge.id.clone(), charge.clone());

        tracing::debug!(charge_id = %charge.id, amount = charge.amount, "sandbox charge captured");
        metrics::counter!("payment_charges_total", "provider" => "sandbox").increment(1);

        Ok(charge)
    }

    async fn refund(&self, request: RefundRequest) -> Result<Refund> {
        let mut state = self.state.write().await;
        state.refund_calls += 1;

        if state.fail_on_refund {
            return Err(PaymentError::Provider("sandbox refund unavailable".to_string()));
        }

        let charge = state
            .charges
            .get_mut(&request.charge_id)
            .ok_or_else(|| PaymentError::ChargeNotFound(request.charge_id.clone()))?;

        if request.amount > charge.refundable() {
            return Err(PaymentError::RefundExceedsCharge {
                requested: request.amount,
                refundable: charge.refundable(),
            });
        }
        charge.refund_amount += request.amount;

        state.next_id += 1;
        let refund = Refund {
            id: format!("re_{:06}", state.next_id),
            charge_id: request.charge_id,
            amount: request.amount,
            currency: request.currency,
            reason: request.reason,
            created: unix_now(),
        };
        state.refunds.push(refund.clone());

        tracing::debug!(refund_id = %refund.id, charge_id = %refund.charge_id, "sandbox refund issued");
        metrics::counter!("payment_refunds_total", "provider" => "sandbox").increment(1);

        Ok(refund)
    }
}
