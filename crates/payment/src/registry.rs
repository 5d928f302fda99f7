use std::collections::HashMap;
use std::sync::Arc;

use domain::ProviderId;

use crate::{PaymentError, PaymentProvider, Result};

/// Payment providers available to the process, keyed by id.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderId, Arc<dyn PaymentProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider under its own id, replacing any previous one.
    pub fn register(mut self, provider: Arc<dyn PaymentProvider>) -> Self {
        self.providers.insert(provider.id(), provider);
        self
    }

    /// Resolves a provider.
    pub fn get(&self, id: ProviderId) -> Result<Arc<dyn PaymentProvider>> {
        self.providers
            .get(&id)
            .cloned()
            .ok_or(PaymentError::UnregisteredProvider(id))
    }

    pub fn contains(&self, id: ProviderId) -> bool {
        self.providers.contains_key(&id)
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryPaymentProvider;

    #[test]
    fn test_resolve_registered_provider() {
        let registry =
            ProviderRegistry::new().register(Arc::new(InMemoryPaymentProvider::new()));
        assert!(registry.contains(ProviderId::Sandbox));
        assert_eq!(registry.get(ProviderId::Sandbox).unwrap().id(), ProviderId::Sandbox);
    }

    #[test]
    fn test_unregistered_provider() {
        let registry = ProviderRegistry::new();
        assert!(matches!(
            registry.get(ProviderId::Stripe),
            Err(PaymentError::UnregisteredProvider(ProviderId::Stripe))
        ));
    }
}
