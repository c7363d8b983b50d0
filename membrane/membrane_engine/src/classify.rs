//! Value classification.
//!
//! Decides whether a value crosses the boundary unchanged or must be
//! wrapped, and which kind of wrapper it needs.

use membrane_core::{ObjectClass, Value};
use serde::{Deserialize, Serialize};

/// The crossing behavior of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueClass {
    /// No identity; crosses unchanged.
    Primitive,
    /// A plain object, including dates, regexps and errors.
    Object,
    /// An array.
    Array,
    /// A callable object.
    Function,
}

impl ValueClass {
    /// Whether values of this class need a wrapper to cross.
    pub fn needs_wrapper(&self) -> bool {
        !matches!(self, Self::Primitive)
    }
}

/// Classify a value.
pub fn classify(value: &Value) -> ValueClass {
    match value {
        Value::Object(object) if object.is_callable() => ValueClass::Function,
        Value::Object(object) => match object.class() {
            ObjectClass::Array => ValueClass::Array,
            _ => ValueClass::Object,
        },
        _ => ValueClass::Primitive,
    }
}
