//! Property descriptors.

use super::Value;
use crate::error::Result;

/// Metadata describing one property.
///
/// Every field is optional so that partial descriptors, as passed to
/// `define_own_property`, can be represented. Descriptors returned by
/// `get_own_property` are always complete: either a data descriptor with
/// `value` and `writable`, or an accessor descriptor with `get` and `set`,
/// plus `enumerable` and `configurable`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyDescriptor {
    /// The stored value of a data property.
    pub value: Option<Value>,
    /// Whether a data property's value may change.
    pub writable: Option<bool>,
    /// The getter of an accessor property (`undefined` or a function).
    pub get: Option<Value>,
    /// The setter of an accessor property (`undefined` or a function).
    pub set: Option<Value>,
    /// Whether the property shows up in enumeration.
    pub enumerable: Option<bool>,
    /// Whether the property may be deleted or reshaped.
    pub configurable: Option<bool>,
}

impl PropertyDescriptor {
    /// A complete data descriptor.
    pub fn data(value: impl Into<Value>, writable: bool, enumerable: bool, configurable: bool) -> Self {
        Self {
            value: Some(value.into()),
            writable: Some(writable),
            get: None,
            set: None,
            enumerable: Some(enumerable),
            configurable: Some(configurable),
        }
    }

    /// A writable, enumerable, configurable data descriptor.
    pub fn plain(value: impl Into<Value>) -> Self {
        Self::data(value, true, true, true)
    }

    /// A partial descriptor that only changes the value.
    pub fn value_only(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// A complete accessor descriptor.
    pub fn accessor(getter: Value, setter: Value, enumerable: bool, configurable: bool) -> Self {
        Self {
            value: None,
            writable: None,
            get: Some(getter),
            set: Some(setter),
            enumerable: Some(enumerable),
            configurable: Some(configurable),
        }
    }

    /// Whether this describes an accessor property.
    pub fn is_accessor(&self) -> bool {
        self.get.is_some() || self.set.is_some()
    }

    /// Whether this describes a data property.
    pub fn is_data(&self) -> bool {
        self.value.is_some() || self.writable.is_some()
    }

    /// Whether this is neither a data nor an accessor descriptor.
    pub fn is_generic(&self) -> bool {
        !self.is_accessor() && !self.is_data()
    }

    /// `configurable`, defaulting to `false`.
    pub fn is_configurable(&self) -> bool {
        self.configurable.unwrap_or(false)
    }

    /// `enumerable`, defaulting to `false`.
    pub fn is_enumerable(&self) -> bool {
        self.enumerable.unwrap_or(false)
    }

    /// `writable`, defaulting to `false`.
    pub fn is_writable(&self) -> bool {
        self.writable.unwrap_or(false)
    }

    /// Fill absent fields with their defaults.
    pub fn complete(mut self) -> Self {
        if self.is_accessor() {
            self.get.get_or_insert(Value::Undefined);
            self.set.get_or_insert(Value::Undefined);
        } else {
            self.value.get_or_insert(Value::Undefined);
            self.writable.get_or_insert(false);
        }
        self.enumerable.get_or_insert(false);
        self.configurable.get_or_insert(false);
        self
    }

    /// Transform `value`, `get` and `set` with `f`, keeping the boolean
    /// attributes untouched.
    pub fn try_map_values<F>(self, mut f: F) -> Result<Self>
    where
        F: FnMut(Value) -> Result<Value>,
    {
        Ok(Self {
            value: self.value.map(&mut f).transpose()?,
            writable: self.writable,
            get: self.get.map(&mut f).transpose()?,
            set: self.set.map(&mut f).transpose()?,
            enumerable: self.enumerable,
            configurable: self.configurable,
        })
    }
}
