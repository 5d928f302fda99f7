//! Shared identity types for the order checkout service.
//!
//! Every persisted or lockable object is addressed by a `(namespace, id)`
//! pair. The [`Namespaced`] trait exposes that pair so the store and the lock
//! manager can derive keys without knowing the concrete entity type.

mod types;

pub use types::{Namespaced, ObjectId, ObjectRef, unix_now};
