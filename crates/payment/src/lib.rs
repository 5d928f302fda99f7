//! Payment provider integration.
//!
//! The checkout flows only see the [`PaymentProvider`] trait: charge a card,
//! refund a charge. Providers are registered once at startup in a
//! [`ProviderRegistry`] and resolved by [`ProviderId`](domain::ProviderId).

pub mod card;
pub mod error;
pub mod memory;
pub mod provider;
pub mod registry;

pub use card::{Card, CardBrand};
pub use error::{PaymentError, Result};
pub use memory::InMemoryPaymentProvider;
pub use provider::{ChargeRequest, PaymentProvider, RefundRequest};
pub use registry::ProviderRegistry;
