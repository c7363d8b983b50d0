//! # Membrane Engine
//!
//! This crate implements membranes: identity-preserving, revocable
//! boundaries between object graphs. A value crossing from one graph into
//! another is replaced by a wrapper that intercepts every fundamental
//! operation, translates arguments and results across the boundary, and
//! fails with [`membrane_core::Error::RevokedAccess`] once the boundary is
//! severed.
//!
//! ## Core Components
//!
//! - **Classify**: Decides whether a value crosses unchanged or needs a wrapper
//! - **Identity**: Keeps one wrapper per value per ordered graph pair
//! - **Revocation**: One-way flags per graph or per graph pair
//! - **Wrapper**: The trap engine implementing `ObjectOps`
//! - **Membrane**: The facade tying the pieces together
//!
//! ## Usage Example
//!
//! ```rust
//! use membrane_core::{Realm, Value};
//! use membrane_engine::create_membrane;
//!
//! let realm = Realm::new();
//! let document = realm.object();
//! document.set("nodeType", 9).unwrap();
//!
//! let created = create_membrane(document.to_value()).unwrap();
//! let dry_document = created.membrane.as_object().unwrap().clone();
//! assert_eq!(dry_document.get("nodeType").unwrap(), Value::from(9));
//!
//! assert!(created.revoke.revoke());
//! assert!(dry_document.get("nodeType").unwrap_err().is_revoked());
//! ```

pub mod classify;
pub mod config;
pub mod identity;
pub mod membrane;
pub mod revocation;
pub mod wrapper;

pub use classify::{classify, ValueClass};
pub use config::{ConfigError, GraphNames, MembraneConfig, RevocationScope};
pub use identity::{IdentityMap, Provenance};
pub use membrane::{create_membrane, create_membrane_with_config, CreatedMembrane, Membrane};
pub use revocation::{RevocationController, RevocationFlag, RevocationGuard, RevocationTarget, Revoker};
pub use wrapper::Wrapper;
