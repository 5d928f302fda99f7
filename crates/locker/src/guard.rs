use sqlx::Postgres;
use sqlx::pool::PoolConnection;
use tokio::sync::OwnedSemaphorePermit;

use crate::LockResult;
use crate::postgres::AdvisoryKey;

/// Backend-specific state of a held lock.
pub(crate) enum Held {
    Memory(OwnedSemaphorePermit),
    Postgres(PoolConnection<Postgres>, AdvisoryKey),
}

/// Proof of exclusive ownership of a lock key.
///
/// Call [`LockGuard::release`] to release the lock and observe backend
/// errors. Dropping an unreleased guard releases it as well; for the
/// PostgreSQL backend the unlock then happens on a spawned task.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct LockGuard {
    key: String,
    held: Option<Held>,
}

impl LockGuard {
    pub(crate) fn new(key: String, held: Held) -> Self {
        Self {
            key,
            held: Some(held),
        }
    }

    /// The key this guard holds.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns true until the guard has been released.
    pub fn is_held(&self) -> bool {
        self.held.is_some()
    }

    /// Releases the lock.
    ///
    /// Idempotent: releasing an already released guard is a no-op.
    pub async fn release(&mut self) -> LockResult<()> {
        match self.held.take() {
            None => Ok(()),
            Some(Held::Memory(permit)) => {
                drop(permit);
                tracing::trace!(key = %self.key, "lock released");
                Ok(())
            }
            Some(Held::Postgres(mut conn, advisory)) => {
                crate::postgres::unlock(&mut conn, &self.key, &advisory).await?;
                tracing::trace!(key = %self.key, "lock released");
                Ok(())
            }
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Some(Held::Postgres(conn, advisory)) = self.held.take() {
            crate::postgres::unlock_detached(conn, std::mem::take(&mut self.key), advisory);
        }
    }
}

impl std::fmt::Debug for LockGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockGuard")
            .field("key", &self.key)
            .field("held", &self.is_held())
            .finish()
    }
}
