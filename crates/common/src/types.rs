use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a stored object.
///
/// Wraps a UUID so identifiers coming from requests can be validated once
/// and then passed around as plain strings in documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(Uuid);

impl ObjectId {
    /// Creates a new random object ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an object ID from its string form.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }

    /// Creates an object ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ObjectId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<ObjectId> for Uuid {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

/// An object addressable by namespace and identifier.
///
/// Either component may be empty on a half-built object; consumers that need
/// a key (the store, the lock manager) reject empty components themselves.
pub trait Namespaced {
    /// The namespace partitioning the key space, e.g. `"order"`.
    fn namespace(&self) -> &str;

    /// The identifier within the namespace.
    fn id(&self) -> &str;
}

/// A bare `(namespace, id)` reference.
///
/// Used to lock an object before it has been loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    namespace: String,
    id: String,
}

impl ObjectRef {
    pub fn new(namespace: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            id: id.into(),
        }
    }
}

impl Namespaced for ObjectRef {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// Current time as unix seconds.
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}
