//! Order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use domain::{Currency, ItemKind, Order, OrderItem, Shipping};
use orders::NewOrder;
use payment::Card;
use serde::Deserialize;
use store::{ListOptions, Sort, Store};

use crate::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub email: String,
    #[serde(default)]
    pub currency: Currency,
    pub items: Vec<OrderItemRequest>,
    #[serde(default)]
    pub shipping: Shipping,
}

/// A raw line item. `currency` defaults to the order currency.
#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub parent: Option<String>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub amount: i64,
    pub currency: Option<Currency>,
    #[serde(default)]
    pub description: String,
}

impl CreateOrderRequest {
    fn into_new_order(self) -> NewOrder {
        let currency = self.currency;
        let items = self
            .items
            .into_iter()
            .map(|item| OrderItem {
                kind: item.kind,
                parent: item.parent,
                quantity: item.quantity,
                amount: item.amount,
                currency: item.currency.unwrap_or(currency),
                description: item.description,
            })
            .collect();

        NewOrder {
            email: self.email,
            currency,
            items,
            shipping: self.shipping,
        }
    }
}

#[derive(Deserialize)]
pub struct PayRequest {
    pub card: Card,
}

/// Paging query parameters shared by list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub sort: Option<String>,
}

impl ListQuery {
    pub fn into_options(self) -> Result<ListOptions, ApiError> {
        let mut options = ListOptions::new();
        if let Some(page) = self.page {
            options = options.page(page);
        }
        if let Some(limit) = self.limit {
            options = options.limit(limit);
        }
        if let Some(sort) = self.sort {
            let sort = Sort::parse(&sort)
                .ok_or_else(|| ApiError::BadRequest(format!("invalid sort: {sort:?}")))?;
            options = options.sort(sort);
        }
        Ok(options)
    }
}

// -- Handlers --

/// POST /orders: create an order from raw line items.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let order = state.orders.new_order(req.into_new_order()).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders/{id}: load an order.
#[tracing::instrument(skip(state))]
pub async fn get<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(state.orders.get(&id).await?))
}

/// GET /orders: list orders, newest first unless `sort` says otherwise.
#[tracing::instrument(skip(state))]
pub async fn list<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let options = query.into_options()?;
    Ok(Json(state.orders.list(options).await?))
}

/// POST /orders/{id}/pay: charge a card for the order.
#[tracing::instrument(skip(state, req))]
pub async fn pay<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<PayRequest>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(state.orders.pay(&id, req.card).await?))
}

/// POST /orders/{id}/return: refund the order.
#[tracing::instrument(skip(state))]
pub async fn return_order<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(state.orders.return_order(&id).await?))
}

/// POST /orders/{id}/fulfill: mark a paid order as shipped.
#[tracing::instrument(skip(state))]
pub async fn fulfill<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(state.orders.fulfill(&id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_currency_defaults_to_order_currency() {
        let req: CreateOrderRequest = serde_json::from_value(serde_json::json!({
            "email": "a@b.c",
            "currency": "EUR",
            "items": [
                { "type": "sku", "parent": "p", "quantity": 2 },
                { "type": "tax", "amount": 10, "currency": "USD" }
            ]
        }))
        .unwrap();

        let new = req.into_new_order();
        assert_eq!(new.currency, Currency::Eur);
        assert_eq!(new.items[0].currency, Currency::Eur);
        assert_eq!(new.items[1].currency, Currency::Usd);
    }

    #[test]
    fn test_list_query_rejects_unknown_sort() {
        let query = ListQuery {
            sort: Some("email".to_string()),
            ..Default::default()
        };
        assert!(query.into_options().is_err());
    }

    #[test]
    fn test_list_query_defaults() {
        let options = ListQuery::default().into_options().unwrap();
        assert_eq!(options, ListOptions::default());
    }
}
