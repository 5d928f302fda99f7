use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{ListOptions, Record, Result, SortField, StoreError, store::Store};

type Key = (String, String);

#[derive(Default)]
struct State {
    records: HashMap<Key, Record>,
    /// Number of upcoming `replace_record` calls to reject, per namespace.
    failing_updates: HashMap<String, usize>,
    /// Number of `replace_record` calls seen, per namespace.
    update_calls: HashMap<String, usize>,
}

/// In-memory document store implementation for testing.
///
/// This implementation keeps all records in memory and provides
/// the same interface as the PostgreSQL implementation, plus failure
/// injection for exercising retry and compensation paths.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of records stored.
    pub async fn record_count(&self) -> usize {
        self.state.read().await.records.len()
    }

    /// Makes the next `times` updates in `namespace` fail with `Unavailable`.
    pub async fn fail_updates(&self, namespace: &str, times: usize) {
        self.state
            .write()
            .await
            .failing_updates
            .insert(namespace.to_string(), times);
    }

    /// Returns how many updates were attempted in `namespace`.
    pub async fn update_calls(&self, namespace: &str) -> usize {
        self.state
            .read()
            .await
            .update_calls
            .get(namespace)
            .copied()
            .unwrap_or(0)
    }

    /// Clears all records and injected failures.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.records.clear();
        state.failing_updates.clear();
        state.update_calls.clear();
    }
}

fn sort_records(records: &mut [Record], options: &ListOptions) {
    records.sort_by(|a, b| {
        let ord = match options.sort.field {
            SortField::Created => a.created.cmp(&b.created),
            SortField::Updated => a.updated.cmp(&b.updated),
        }
        .then_with(|| a.id.cmp(&b.id));
        if options.sort.descending {
            ord.reverse()
        } else {
            ord
        }
    });
}

#[async_trait]
impl Store for InMemoryStore {
    async fn get_record(&self, namespace: &str, id: &str) -> Result<Record> {
        let state = self.state.read().await;
        state
            .records
            .get(&(namespace.to_string(), id.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                namespace: namespace.to_string(),
                id: id.to_string(),
            })
    }

    async fn put_record(&self, record: Record) -> Result<()> {
        let mut state = self.state.write().await;
        let key = (record.namespace.clone(), record.id.clone());
        state.records.insert(key, record);
        Ok(())
    }

    async fn replace_record(&self, record: Record) -> Result<()> {
        let mut state = self.state.write().await;

        *state
            .update_calls
            .entry(record.namespace.clone())
            .or_default() += 1;

        if let Some(remaining) = state.failing_updates.get_mut(&record.namespace)
            && *remaining > 0
        {
            *remaining -= 1;
            return Err(StoreError::Unavailable(format!(
                "injected update failure for {}/{}",
                record.namespace, record.id
            )));
        }

        let key = (record.namespace.clone(), record.id.clone());
        match state.records.get_mut(&key) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(StoreError::NotFound {
                namespace: key.0,
                id: key.1,
            }),
        }
    }

    async fn list_records(&self, namespace: &str, options: &ListOptions) -> Result<Vec<Record>> {
        let state = self.state.read().await;
        let mut records: Vec<_> = state
            .records
            .values()
            .filter(|r| r.namespace == namespace)
            .cloned()
            .collect();

        sort_records(&mut records, options);

        Ok(records
            .into_iter()
            .skip(options.offset())
            .take(options.limit)
            .collect())
    }

    async fn list_records_by_parent(&self, namespace: &str, parent: &str) -> Result<Vec<Record>> {
        let state = self.state.read().await;
        let mut records: Vec<_> = state
            .records
            .values()
            .filter(|r| r.namespace == namespace && r.parent.as_deref() == Some(parent))
            .cloned()
            .collect();

        records.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.id.cmp(&b.id)));
        Ok(records)
    }
}
