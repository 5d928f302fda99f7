use std::time::Duration;

use async_trait::async_trait;
use common::Namespaced;

use crate::{LockGuard, LockResult};

/// Named mutual exclusion over namespaced objects.
///
/// Locks are not reentrant: locking a key the caller already holds waits
/// (or times out) like any other contender.
#[async_trait]
pub trait Locker: Send + Sync {
    /// Waits until the target's key is exclusively held.
    ///
    /// Fails only if no key can be derived from the target.
    async fn lock(&self, target: &(dyn Namespaced + Sync)) -> LockResult<LockGuard>;

    /// Attempts to acquire the target's key within `timeout`.
    ///
    /// Fails with `Timeout` if the key is still held by someone else when
    /// the timeout elapses, and with `MissingInformation` on a malformed key.
    async fn try_lock(
        &self,
        target: &(dyn Namespaced + Sync),
        timeout: Duration,
    ) -> LockResult<LockGuard>;

    /// Releases manager-level resources. Safe to call more than once.
    async fn close(&self) -> LockResult<()>;

    /// Short backend name used in logs.
    fn backend(&self) -> &'static str;
}
