//! PostgreSQL advisory-lock manager implementation.
//!
//! Each held lock pins one pooled connection holding a session-level
//! advisory lock on `(hashtext(namespace), hashtext(id))`. The lock lives as
//! long as that session, so a crashed process releases its locks when its
//! connections drop.
//!
//! Targets in different namespaces never share a lock. Two ids in the same
//! namespace whose `hashtext` values collide do: a flow holding one of them
//! blocks on the other, and with `try_lock` that surfaces as a timeout.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use common::Namespaced;
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres};

use crate::guard::Held;
use crate::{LockError, LockGuard, LockResult, Locker, lock_key};

/// Interval between `pg_try_advisory_lock` attempts in `try_lock`.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Lock manager backed by PostgreSQL advisory locks.
#[derive(Clone)]
pub struct PostgresLocker {
    pool: PgPool,
}

impl PostgresLocker {
    /// Creates a locker over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `url`.
    ///
    /// A failed connection is reported here, never from `lock`/`try_lock`.
    pub async fn connect(url: &str, max_connections: u32) -> LockResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    async fn try_acquire_once(
        conn: &mut PoolConnection<Postgres>,
        key: &AdvisoryKey,
    ) -> LockResult<bool> {
        let acquired: bool =
            sqlx::query_scalar("SELECT pg_try_advisory_lock(hashtext($1), hashtext($2))")
                .bind(&key.namespace)
                .bind(&key.id)
                .fetch_one(&mut **conn)
                .await?;
        Ok(acquired)
    }
}

/// The two halves of an advisory lock, hashed separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AdvisoryKey {
    pub namespace: String,
    pub id: String,
}

impl AdvisoryKey {
    fn of(target: &(dyn Namespaced + Sync)) -> Self {
        Self {
            namespace: target.namespace().to_string(),
            id: target.id().to_string(),
        }
    }
}

/// Releases the advisory lock held on `conn`.
pub(crate) async fn unlock(
    conn: &mut PoolConnection<Postgres>,
    key: &str,
    advisory: &AdvisoryKey,
) -> LockResult<()> {
    let released: bool =
        sqlx::query_scalar("SELECT pg_advisory_unlock(hashtext($1), hashtext($2))")
            .bind(&advisory.namespace)
            .bind(&advisory.id)
            .fetch_one(&mut **conn)
            .await?;
    if !released {
        tracing::warn!(%key, "advisory lock was not held at release");
    }
    Ok(())
}

/// Releases from a context that cannot await, such as `Drop`.
///
/// Without a runtime the connection is closed instead, which ends the
/// session and with it the lock.
pub(crate) fn unlock_detached(conn: PoolConnection<Postgres>, key: String, advisory: AdvisoryKey) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                let mut conn = conn;
                if let Err(e) = unlock(&mut conn, &key, &advisory).await {
                    tracing::error!(%key, error = %e, "failed to release dropped advisory lock");
                    drop(conn.detach());
                }
            });
        }
        Err(_) => drop(conn.detach()),
    }
}

#[async_trait]
impl Locker for PostgresLocker {
    async fn lock(&self, target: &(dyn Namespaced + Sync)) -> LockResult<LockGuard> {
        let key = lock_key(target)?;
        let advisory = AdvisoryKey::of(target);
        let mut conn = self.pool.acquire().await?;

        sqlx::query("SELECT pg_advisory_lock(hashtext($1), hashtext($2))")
            .bind(&advisory.namespace)
            .bind(&advisory.id)
            .execute(&mut *conn)
            .await?;

        tracing::trace!(%key, "advisory lock acquired");
        Ok(LockGuard::new(key, Held::Postgres(conn, advisory)))
    }

    async fn try_lock(
        &self,
        target: &(dyn Namespaced + Sync),
        timeout: Duration,
    ) -> LockResult<LockGuard> {
        let key = lock_key(target)?;
        let advisory = AdvisoryKey::of(target);
        let started = Instant::now();
        let timed_out = |key: String| {
            metrics::counter!("lock_timeouts_total", "backend" => "postgres").increment(1);
            tracing::debug!(%key, ?timeout, "advisory lock wait timed out");
            LockError::Timeout { key, timeout }
        };

        let mut conn = match tokio::time::timeout(timeout, self.pool.acquire()).await {
            Ok(conn) => conn?,
            Err(_) => return Err(timed_out(key)),
        };

        loop {
            if Self::try_acquire_once(&mut conn, &advisory).await? {
                metrics::histogram!("lock_wait_seconds", "backend" => "postgres")
                    .record(started.elapsed().as_secs_f64());
                tracing::trace!(%key, "advisory lock acquired");
                return Ok(LockGuard::new(key, Held::Postgres(conn, advisory)));
            }

            let elapsed = started.elapsed();
            if elapsed >= timeout {
                return Err(timed_out(key));
            }
            tokio::time::sleep(POLL_INTERVAL.min(timeout - elapsed)).await;
        }
    }

    async fn close(&self) -> LockResult<()> {
        // PgPool::close is idempotent
        self.pool.close().await;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
