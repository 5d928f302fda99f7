use common::Namespaced;
use serde::{Serialize, de::DeserializeOwned};

use crate::{Result, StoreError};

/// A persistable entity.
///
/// The namespace is fixed per type so that loading by id does not need an
/// instance.
pub trait Document: Namespaced + Serialize + DeserializeOwned + Send + Sync {
    /// Namespace every document of this type is stored under.
    const NAMESPACE: &'static str;

    /// Assigns the identifier. Called by `insert` when the id is empty.
    fn set_id(&mut self, id: String);

    /// Parent object id, for documents listed by parent.
    fn parent(&self) -> Option<&str> {
        None
    }

    /// Creation time in unix seconds, 0 if never stored.
    fn created(&self) -> i64;

    fn set_created(&mut self, created: i64);

    fn set_updated(&mut self, updated: i64);
}

/// A stored document in its raw form.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub namespace: String,
    pub id: String,
    pub parent: Option<String>,
    pub created: i64,
    pub updated: i64,
    pub body: serde_json::Value,
}

impl Record {
    /// Serializes a document into a record.
    ///
    /// Fails with `MissingIdentity` if the document has no id.
    pub fn from_document<T: Document>(doc: &T, created: i64, updated: i64) -> Result<Self> {
        if doc.id().is_empty() {
            return Err(StoreError::MissingIdentity {
                namespace: T::NAMESPACE.to_string(),
            });
        }

        Ok(Self {
            namespace: T::NAMESPACE.to_string(),
            id: doc.id().to_string(),
            parent: doc.parent().map(str::to_string),
            created,
            updated,
            body: serde_json::to_value(doc)?,
        })
    }

    /// Deserializes the record body into a document.
    pub fn into_document<T: Document>(self) -> Result<T> {
        Ok(serde_json::from_value(self.body)?)
    }
}
