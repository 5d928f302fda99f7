use common::Namespaced;

use crate::{LockError, LockResult};

/// Derives the lock key `namespace-id` for a target.
///
/// Fails with `MissingInformation` if either component is empty.
pub fn lock_key(target: &(dyn Namespaced + Sync)) -> LockResult<String> {
    let namespace = target.namespace();
    let id = target.id();
    if namespace.is_empty() || id.is_empty() {
        return Err(LockError::MissingInformation {
            namespace: namespace.to_string(),
            id: id.to_string(),
        });
    }
    Ok(format!("{namespace}-{id}"))
}
