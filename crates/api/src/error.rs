//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use inventory::InventoryError;
use orders::{ErrorKind, OrderServiceError};

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Order service error.
    Orders(OrderServiceError),
    /// SKU service error.
    Inventory(InventoryError),
}

impl ApiError {
    /// The response status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Orders(err) => kind_to_status(err.kind()),
            ApiError::Inventory(err) => match err {
                InventoryError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                InventoryError::NotFound(_) => StatusCode::NOT_FOUND,
                InventoryError::Lock(lock) if lock.is_timeout() => StatusCode::CONFLICT,
                InventoryError::Lock(_) | InventoryError::Store(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

fn kind_to_status(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::LockTimeout => StatusCode::CONFLICT,
        ErrorKind::PreconditionFailed => StatusCode::PRECONDITION_FAILED,
        ErrorKind::Provider => StatusCode::PAYMENT_REQUIRED,
        ErrorKind::DataLoss | ErrorKind::Internal | ErrorKind::Fatal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (kind, message) = match self {
            ApiError::BadRequest(msg) => (ErrorKind::InvalidInput.as_str(), msg),
            ApiError::Orders(err) => (err.kind().as_str(), err.to_string()),
            ApiError::Inventory(err) => ("inventory", err.to_string()),
        };

        if status.is_server_error() {
            tracing::error!(error = %message, kind, "internal server error");
        }

        let body = serde_json::json!({ "error": message, "kind": kind });
        (status, axum::Json(body)).into_response()
    }
}

impl From<OrderServiceError> for ApiError {
    fn from(err: OrderServiceError) -> Self {
        ApiError::Orders(err)
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        ApiError::Inventory(err)
    }
}
