//! Backend selection.

use std::sync::Arc;

use crate::{LockError, LockResult, Locker, MemoryLocker, PostgresLocker};

/// Which lock backend to run and how to reach it.
#[derive(Debug, Clone)]
pub struct LockerConfig {
    /// Backend name: `memory` or `postgres`.
    pub backend: String,
    /// Connection URL for remote backends.
    pub url: Option<String>,
    /// Pool size for remote backends.
    pub max_connections: u32,
}

impl Default for LockerConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            url: None,
            max_connections: 20,
        }
    }
}

/// Builds the process-wide locker named by `config.backend`.
///
/// Unknown backend names fall back to the in-memory locker so there is
/// always a working locker; that case is logged, not returned as an error.
/// A remote backend that cannot connect is an error.
pub async fn connect(config: &LockerConfig) -> LockResult<Arc<dyn Locker>> {
    match config.backend.as_str() {
        "postgres" => {
            let url = config
                .url
                .as_deref()
                .ok_or_else(|| LockError::Config("postgres locker requires a url".to_string()))?;
            let locker = PostgresLocker::connect(url, config.max_connections).await?;
            tracing::info!(backend = "postgres", "locker ready");
            Ok(Arc::new(locker))
        }
        "memory" => {
            tracing::info!(backend = "memory", "locker ready");
            Ok(Arc::new(MemoryLocker::new()))
        }
        other => {
            tracing::warn!(requested = %other, "unknown locker backend, using memory");
            Ok(Arc::new(MemoryLocker::new()))
        }
    }
}
