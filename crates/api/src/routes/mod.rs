//! HTTP route handlers.

pub mod health;
pub mod orders;
pub mod skus;
