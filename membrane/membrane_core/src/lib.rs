//! # Membrane Core
//!
//! `membrane_core` provides the dynamic object model that membranes operate
//! on: tagged values, property keys and descriptors, shared object handles,
//! and the [`ObjectOps`] dispatch table through which every fundamental
//! operation is performed.
//!
//! ## Core Principles
//!
//! 1. **Identity**: Objects are reference-counted handles compared by
//!    [`ObjectId`]. Primitives have no identity and are compared by value.
//!
//! 2. **Uniform Dispatch**: Property reads and writes, enumeration,
//!    prototype access, extensibility and calls all go through
//!    [`ObjectOps`]. An object that implements the trait can stand in for
//!    any other object, which is what a membrane wrapper does.
//!
//! 3. **Reentrancy**: No implementation holds a lock while calling into
//!    another object or into application code.
//!
//! ## Crate Structure
//!
//! - **error**: The error enum and `Result` alias
//! - **id**: Object, membrane, realm and graph identifiers
//! - **traits**: The `ObjectOps` dispatch table
//! - **types**: Values, keys and property descriptors
//! - **object**: Object handles and ordinary objects
//! - **realm**: Intrinsic prototypes and object factories
//! - **builtins**: Generic array and object algorithms
//! - **utils**: Log levels
//! - **macros**: The `log_event!` logging macro

pub mod builtins;
pub mod error;
pub mod id;
pub mod macros;
pub mod object;
pub mod realm;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export key types and traits for convenience
pub use error::{Error, Result};
pub use id::{GraphName, MembraneId, ObjectId, RealmId};
pub use object::{InternalSlot, NativeFn, ObjectRef, OrdinaryObject, WeakObjectRef};
pub use realm::Realm;
pub use traits::ObjectOps;
pub use types::{ObjectClass, PropertyDescriptor, PropertyKey, Symbol, Value};
pub use utils::LogLevel;
