use async_trait::async_trait;
use common::{ObjectId, unix_now};

use crate::{Document, ListOptions, Record, Result};

/// Core trait for document store implementations.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Store: Send + Sync {
    /// Loads the record stored under `(namespace, id)`.
    ///
    /// Fails with `NotFound` if there is none.
    async fn get_record(&self, namespace: &str, id: &str) -> Result<Record>;

    /// Stores a record, replacing any existing record with the same key.
    ///
    /// Writing the same record twice leaves the store unchanged, so callers
    /// may retry.
    async fn put_record(&self, record: Record) -> Result<()>;

    /// Replaces an existing record.
    ///
    /// Fails with `NotFound` if no record exists under the key.
    async fn replace_record(&self, record: Record) -> Result<()>;

    /// Lists one page of records in a namespace.
    async fn list_records(&self, namespace: &str, options: &ListOptions) -> Result<Vec<Record>>;

    /// Lists every record in a namespace with the given parent, oldest first.
    async fn list_records_by_parent(&self, namespace: &str, parent: &str) -> Result<Vec<Record>>;
}

/// Typed helpers over any store.
#[async_trait]
pub trait StoreExt: Store {
    /// Loads a document by id.
    async fn one<T: Document>(&self, id: &str) -> Result<T> {
        self.get_record(T::NAMESPACE, id).await?.into_document()
    }

    /// Inserts a document.
    ///
    /// Assigns a fresh id when the document has none, stamps the creation
    /// time on first insert and always refreshes the update time.
    async fn insert<T: Document>(&self, doc: &mut T) -> Result<()> {
        if doc.id().is_empty() {
            doc.set_id(ObjectId::new().to_string());
        }
        let now = unix_now();
        if doc.created() == 0 {
            doc.set_created(now);
        }
        doc.set_updated(now);

        let record = Record::from_document(&*doc, doc.created(), now)?;
        self.put_record(record).await
    }

    /// Persists changes to an existing document and refreshes its update time.
    async fn update<T: Document>(&self, doc: &mut T) -> Result<()> {
        let now = unix_now();
        doc.set_updated(now);

        let record = Record::from_document(&*doc, doc.created(), now)?;
        self.replace_record(record).await
    }

    /// Lists one page of documents.
    async fn list<T: Document>(&self, options: &ListOptions) -> Result<Vec<T>> {
        self.list_records(T::NAMESPACE, options)
            .await?
            .into_iter()
            .map(Record::into_document)
            .collect()
    }

    /// Lists every document belonging to a parent object.
    async fn list_parent<T: Document>(&self, parent: &str) -> Result<Vec<T>> {
        self.list_records_by_parent(T::NAMESPACE, parent)
            .await?
            .into_iter()
            .map(Record::into_document)
            .collect()
    }
}

// Blanket implementation for all Store implementations
impl<T: Store + ?Sized> StoreExt for T {}

#[async_trait]
impl<S: Store + ?Sized> Store for std::sync::Arc<S> {
    async fn get_record(&self, namespace: &str, id: &str) -> Result<Record> {
        (**self).get_record(namespace, id).await
    }

    async fn put_record(&self, record: Record) -> Result<()> {
        (**self).put_record(record).await
    }

    async fn replace_record(&self, record: Record) -> Result<()> {
        (**self).replace_record(record).await
    }

    async fn list_records(&self, namespace: &str, options: &ListOptions) -> Result<Vec<Record>> {
        (**self).list_records(namespace, options).await
    }

    async fn list_records_by_parent(&self, namespace: &str, parent: &str) -> Result<Vec<Record>> {
        (**self).list_records_by_parent(namespace, parent).await
    }
}
