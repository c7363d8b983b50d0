//! Identifiers used throughout the membrane system.
//!
//! Three kinds of identity live here:
//!
//! - [`ObjectId`]: a process-unique, never-reused number assigned to every
//!   object when it is allocated. Identity maps key on it so they never have
//!   to hold a strong reference to the object itself.
//! - [`Id<T>`]: a UUID-backed identifier with a phantom marker, used for
//!   long-lived entities such as membranes and realms.
//! - [`GraphName`]: the label of one side of a membrane (`"wet"`, `"dry"`).
//!
//! # Examples
//!
//! ```
//! use membrane_core::id::{GraphName, MembraneId, ObjectId};
//! use std::str::FromStr;
//!
//! let a = ObjectId::next();
//! let b = ObjectId::next();
//! assert!(b > a);
//!
//! let id_str = "550e8400-e29b-41d4-a716-446655440000";
//! let membrane_id = MembraneId::from_str(id_str).unwrap();
//! assert_eq!(membrane_id.to_string(), id_str);
//!
//! let dry = GraphName::from("dry");
//! assert_eq!(dry.as_str(), "dry");
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::{Ord, PartialOrd};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a single object.
///
/// Object ids are allocated from a global counter and are never reused for
/// the lifetime of the process, so a stale id can never alias a newer object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Allocate a fresh object id.
    pub fn next() -> Self {
        Self(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A type-safe identifier based on UUID.
///
/// The phantom parameter `T` keeps identifiers of different entity kinds
/// from being mixed up even though they share the same representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Id<T> {
    uuid: Uuid,
    #[serde(skip)]
    _marker: std::marker::PhantomData<T>,
}

impl<T> Id<T> {
    /// Create a new random identifier.
    pub fn new() -> Self {
        Self {
            uuid: Uuid::new_v4(),
            _marker: std::marker::PhantomData,
        }
    }

    /// Create an identifier from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            uuid,
            _marker: std::marker::PhantomData,
        }
    }

    /// Get the underlying UUID.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uuid)
    }
}

impl<T> FromStr for Id<T> {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            uuid: Uuid::parse_str(s)?,
            _marker: std::marker::PhantomData,
        })
    }
}

/// Marker type for membranes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MembraneMarker;
/// Identifier for a membrane instance.
pub type MembraneId = Id<MembraneMarker>;

/// Marker type for realms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RealmMarker;
/// Identifier for a realm of intrinsic objects.
pub type RealmId = Id<RealmMarker>;

/// The name of an object graph.
///
/// Cloning is cheap: the name is shared behind an `Arc`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct GraphName(Arc<str>);

impl GraphName {
    /// Create a graph name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for GraphName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GraphName({:?})", self.as_str())
    }
}

impl fmt::Display for GraphName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GraphName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for GraphName {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<GraphName> for String {
    fn from(name: GraphName) -> Self {
        name.as_str().to_string()
    }
}

impl AsRef<str> for GraphName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
