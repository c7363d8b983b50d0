//! The dynamic value model.
//!
//! Values are either primitives, which have no identity and are compared by
//! value, or objects, which are shared handles compared by identity.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::Symbol;
use crate::error::{Error, Result};
use crate::object::ObjectRef;

/// The built-in class of an object.
///
/// The class is fixed when the object is allocated. A wrapper reports the
/// class of its target, so `type_of` and classification are unchanged by a
/// crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectClass {
    /// A plain object.
    Object,
    /// An array with exotic `length` behavior.
    Array,
    /// A callable object.
    Function,
    /// A date carrying a time value.
    Date,
    /// A regular expression carrying a source and flags.
    RegExp,
    /// An error object.
    Error,
}

impl ObjectClass {
    /// The class name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "Object",
            Self::Array => "Array",
            Self::Function => "Function",
            Self::Date => "Date",
            Self::RegExp => "RegExp",
            Self::Error => "Error",
        }
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dynamic value.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// The absent-value sentinel.
    #[default]
    Undefined,
    /// The null value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A double-precision number.
    Number(f64),
    /// An immutable string.
    String(Arc<str>),
    /// A unique symbol.
    Symbol(Symbol),
    /// A reference to an object, array or function.
    Object(ObjectRef),
}

impl Value {
    /// The type tag reported by `typeof`.
    pub fn type_of(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "object",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::Object(obj) if obj.is_callable() => "function",
            Self::Object(_) => "object",
        }
    }

    /// Whether this value is a primitive (has no identity).
    pub fn is_primitive(&self) -> bool {
        !matches!(self, Self::Object(_))
    }

    /// Whether this value is an object.
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Whether this value is `undefined`.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Whether this value is `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether this value is `null` or `undefined`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    /// The object this value refers to.
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Take the object out of this value.
    pub fn into_object(self) -> Option<ObjectRef> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// The number this value holds.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The string this value holds.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The boolean this value holds.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert a primitive to a number.
    ///
    /// Objects and symbols are rejected: converting an object would require
    /// running application code.
    pub fn to_number(&self) -> Result<f64> {
        match self {
            Self::Undefined => Ok(f64::NAN),
            Self::Null => Ok(0.0),
            Self::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Self::Number(n) => Ok(*n),
            Self::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Ok(0.0)
                } else {
                    Ok(trimmed.parse::<f64>().unwrap_or(f64::NAN))
                }
            }
            Self::Symbol(_) => Err(Error::type_error("Cannot convert a Symbol to a number")),
            Self::Object(_) => Err(Error::type_error("Cannot convert an object to a number")),
        }
    }

    /// Convert to an integer, mapping NaN to zero and keeping infinities.
    pub fn to_integer_or_infinity(&self) -> Result<f64> {
        let n = self.to_number()?;
        if n.is_nan() {
            Ok(0.0)
        } else if n.is_infinite() {
            Ok(n)
        } else {
            Ok(n.trunc() + 0.0)
        }
    }

    /// Strict equality: primitives by value, objects by identity.
    pub fn strict_equals(&self, other: &Value) -> bool {
        self == other
    }

    /// SameValue: like strict equality, but NaN equals NaN and +0 differs
    /// from -0. Used when checking whether a frozen property would change.
    pub fn same_value(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => {
                (a.is_nan() && b.is_nan())
                    || (a == b && a.is_sign_negative() == b.is_sign_negative())
            }
            _ => self == other,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            _ => false,
        }
    }
}

fn format_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => format_number(*n, f),
            Self::String(s) => f.write_str(s),
            Self::Symbol(sym) => write!(f, "{}", sym),
            Self::Object(obj) => write!(f, "[object {}]", obj.class()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(Arc::from(s))
    }
}

impl From<Symbol> for Value {
    fn from(sym: Symbol) -> Self {
        Self::Symbol(sym)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Self::Object(obj)
    }
}

impl From<&ObjectRef> for Value {
    fn from(obj: &ObjectRef) -> Self {
        Self::Object(obj.clone())
    }
}

impl From<Option<ObjectRef>> for Value {
    fn from(obj: Option<ObjectRef>) -> Self {
        obj.map_or(Self::Null, Self::Object)
    }
}
