//! Document store for namespaced objects.
//!
//! Objects are persisted as JSON bodies keyed by `(namespace, id)`. The raw
//! [`Store`] trait works on [`Record`]s; [`StoreExt`] layers typed
//! `one/insert/update/list/list_parent` helpers over any [`Document`].

pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod record;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use query::{ListOptions, Sort, SortField};
pub use record::{Document, Record};
pub use store::{Store, StoreExt};
