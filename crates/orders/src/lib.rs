//! Order service.
//!
//! Creates orders from raw line items and runs the two money-moving flows:
//!
//! - **Pay**: lock the order, lock every SKU line, check stock, charge the
//!   provider, persist the paid order, then commit the inventory changes. A
//!   charge whose order cannot be persisted is refunded.
//! - **Return**: lock the order, refund the order total, move it to
//!   `Canceled` (restocking) or `Returned`, and persist.

pub mod error;
pub mod resolve;
pub mod retry;
pub mod service;
pub mod validate;

mod checkout;
mod locks;
mod returns;

pub use error::{ErrorKind, OrderServiceError, Result};
pub use resolve::{merge_items, resolve_items};
pub use retry::{RetryPolicy, with_retry};
pub use service::{NewOrder, OrderService};
