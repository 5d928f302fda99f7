//! Per-object locks keyed by namespace and id.
//!
//! A [`Locker`] hands out [`LockGuard`]s for objects addressed by
//! [`common::Namespaced`]. Two backends exist:
//!
//! - [`MemoryLocker`]: one binary semaphore per key, process-local.
//! - [`PostgresLocker`]: session-level advisory locks held on a pooled
//!   connection, shared by every process using the same database.
//!
//! Exactly one backend is selected per process through [`connect`].

pub mod config;
pub mod error;
pub mod guard;
pub mod key;
pub mod locker;
pub mod memory;
pub mod postgres;

pub use config::{LockerConfig, connect};
pub use error::{LockError, LockResult};
pub use guard::LockGuard;
pub use key::lock_key;
pub use locker::Locker;
pub use memory::MemoryLocker;
pub use postgres::PostgresLocker;
