//! In-memory lock manager implementation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use common::Namespaced;
use tokio::sync::{Mutex, Semaphore};

use crate::guard::Held;
use crate::{LockError, LockGuard, LockResult, Locker, lock_key};

/// Process-local lock manager.
///
/// Keeps one binary semaphore per key. Semaphores are created on first use
/// under the table mutex and never removed while the locker is open, so two
/// callers can never end up holding different semaphores for the same key.
/// The table mutex only guards creation; waiting happens on the semaphore,
/// so different keys lock concurrently.
#[derive(Clone, Default)]
pub struct MemoryLocker {
    table: Arc<Mutex<HashMap<String, Arc<Semaphore>>>>,
}

impl MemoryLocker {
    /// Create a new in-memory locker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys that have been locked at least once.
    pub async fn key_count(&self) -> usize {
        self.table.lock().await.len()
    }

    async fn semaphore(&self, key: &str) -> Arc<Semaphore> {
        let mut table = self.table.lock().await;
        table
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Semaphore::new(1)))
            .clone()
    }
}

#[async_trait]
impl Locker for MemoryLocker {
    async fn lock(&self, target: &(dyn Namespaced + Sync)) -> LockResult<LockGuard> {
        let key = lock_key(target)?;
        let semaphore = self.semaphore(&key).await;

        let permit = semaphore
            .acquire_owned()
            .await
            .map_err(|_| LockError::Closed(key.clone()))?;

        tracing::trace!(%key, "lock acquired");
        Ok(LockGuard::new(key, Held::Memory(permit)))
    }

    async fn try_lock(
        &self,
        target: &(dyn Namespaced + Sync),
        timeout: Duration,
    ) -> LockResult<LockGuard> {
        let key = lock_key(target)?;
        let semaphore = self.semaphore(&key).await;
        let started = Instant::now();

        match tokio::time::timeout(timeout, semaphore.acquire_owned()).await {
            Ok(Ok(permit)) => {
                metrics::histogram!("lock_wait_seconds", "backend" => "memory")
                    .record(started.elapsed().as_secs_f64());
                tracing::trace!(%key, "lock acquired");
                Ok(LockGuard::new(key, Held::Memory(permit)))
            }
            Ok(Err(_)) => Err(LockError::Closed(key)),
            Err(_) => {
                metrics::counter!("lock_timeouts_total", "backend" => "memory").increment(1);
                tracing::debug!(%key, ?timeout, "lock wait timed out");
                Err(LockError::Timeout { key, timeout })
            }
        }
    }

    async fn close(&self) -> LockResult<()> {
        let mut table = self.table.lock().await;
        for semaphore in table.values() {
            semaphore.close();
        }
        table.clear();
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
