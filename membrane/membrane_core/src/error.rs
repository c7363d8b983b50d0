//! Error types for the membrane system.
//!
//! Every fundamental operation returns [`Result`]. Failures are synchronous
//! and local to the operation that raised them; nothing is retried.
//!
//! Application-level exceptions travel as [`Error::Thrown`] carrying the
//! thrown [`Value`], so a membrane can translate the value across the
//! boundary before re-raising it.

use thiserror::Error;

use crate::types::Value;

/// Root error type for the membrane system.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The membrane mediating this value has been revoked.
    #[error("Access through a revoked membrane")]
    RevokedAccess,

    /// A wrapper's view would contradict the real shape of its target.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// A value thrown by application code.
    #[error("Uncaught exception: {0}")]
    Thrown(Value),

    /// A host type error, e.g. calling a value that is not callable.
    #[error("Type error: {0}")]
    Type(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a type error.
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::Type(message.into())
    }

    /// Create an invariant violation.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    /// Raise an application value.
    pub fn thrown(value: impl Into<Value>) -> Self {
        Self::Thrown(value.into())
    }

    /// Whether this error was caused by revocation.
    pub fn is_revoked(&self) -> bool {
        matches!(self, Self::RevokedAccess)
    }

    /// The thrown application value, if this is an application error.
    pub fn thrown_value(&self) -> Option<&Value> {
        match self {
            Self::Thrown(value) => Some(value),
            _ => None,
        }
    }
}

/// Result type for membrane operations.
pub type Result<T> = std::result::Result<T, Error>;
