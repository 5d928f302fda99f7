//! SKU endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use domain::Sku;
use inventory::NewSku;
use store::Store;

use crate::AppState;
use crate::error::ApiError;
use crate::routes::orders::ListQuery;

/// POST /skus: create a SKU.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<NewSku>,
) -> Result<(StatusCode, Json<Sku>), ApiError> {
    let sku = state.orders.skus().create(req).await?;
    Ok((StatusCode::CREATED, Json(sku)))
}

/// GET /skus/{id}: load a SKU.
#[tracing::instrument(skip(state))]
pub async fn get<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Sku>, ApiError> {
    Ok(Json(state.orders.skus().get(&id).await?))
}

/// GET /skus: list SKUs.
#[tracing::instrument(skip(state))]
pub async fn list<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Sku>>, ApiError> {
    let options = query.into_options()?;
    Ok(Json(state.orders.skus().list(options).await?))
}
