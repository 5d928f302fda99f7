//! HTTP API server with observability for the order service.
//!
//! Provides REST endpoints for SKUs, orders and the pay/return flows,
//! with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use domain::ProviderId;
use locker::Locker;
use metrics_exporter_prometheus::PrometheusHandle;
use orders::{OrderService, OrderServiceError};
use payment::{InMemoryPaymentProvider, ProviderRegistry};
use store::Store;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state accessible from all handlers.
pub struct AppState<S> {
    pub orders: OrderService<S>,
    pub store_backend: &'static str,
    pub locker_backend: &'static str,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: Store + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::health::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::health::<S>))
        .route("/skus", post(routes::skus::create::<S>))
        .route("/skus", get(routes::skus::list::<S>))
        .route("/skus/{id}", get(routes::skus::get::<S>))
        .route("/orders", post(routes::orders::create::<S>))
        .route("/orders", get(routes::orders::list::<S>))
        .route("/orders/{id}", get(routes::orders::get::<S>))
        .route("/orders/{id}/pay", post(routes::orders::pay::<S>))
        .route("/orders/{id}/return", post(routes::orders::return_order::<S>))
        .route("/orders/{id}/fulfill", post(routes::orders::fulfill::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// The providers this build can charge through.
pub fn default_registry() -> ProviderRegistry {
    ProviderRegistry::new().register(Arc::new(InMemoryPaymentProvider::new()))
}

/// Creates application state over `store` and `locker`.
///
/// Fails with `Fatal` if `provider` is not in `registry`.
pub fn create_state<S: Store + Clone + 'static>(
    store: S,
    store_backend: &'static str,
    locker: Arc<dyn Locker>,
    registry: &ProviderRegistry,
    provider: ProviderId,
) -> Result<Arc<AppState<S>>, OrderServiceError> {
    let locker_backend = locker.backend();
    let orders = OrderService::new(store, locker, registry, provider)?;

    Ok(Arc::new(AppState {
        orders,
        store_backend,
        locker_backend,
    }))
}
