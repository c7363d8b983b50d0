//! The fundamental-operation dispatch table.
//!
//! Every object, whether an ordinary object or a membrane wrapper, is
//! reached only through [`ObjectOps`]. Property access, enumeration,
//! prototype walks and calls never touch an object's fields directly, which
//! is what lets a wrapper intercept all of them.

use std::any::Any;
use std::fmt;

use crate::error::{Error, Result};
use crate::id::ObjectId;
use crate::object::ObjectRef;
use crate::types::{ObjectClass, PropertyDescriptor, PropertyKey, Value};

/// The essential internal methods of an object.
///
/// Implementations must never hold an internal lock while calling into
/// another object or into application code (getters, setters, functions):
/// those calls may re-enter the same object.
pub trait ObjectOps: fmt::Debug + Send + Sync + 'static {
    /// The identity of this object.
    fn id(&self) -> ObjectId;

    /// The built-in class of this object.
    fn class(&self) -> ObjectClass;

    /// Whether `call` is supported.
    fn is_callable(&self) -> bool {
        false
    }

    /// Whether `construct` is supported.
    fn is_constructor(&self) -> bool {
        false
    }

    /// Read the prototype link.
    fn get_prototype_of(&self) -> Result<Option<ObjectRef>>;

    /// Replace the prototype link. Returns `false` if refused.
    fn set_prototype_of(&self, prototype: Option<ObjectRef>) -> Result<bool>;

    /// Whether new properties may be added.
    fn is_extensible(&self) -> Result<bool>;

    /// Forbid new properties. Returns `false` if refused.
    fn prevent_extensions(&self) -> Result<bool>;

    /// The complete descriptor of an own property.
    fn get_own_property(&self, key: &PropertyKey) -> Result<Option<PropertyDescriptor>>;

    /// Create or reshape an own property. Returns `false` if refused.
    fn define_own_property(&self, key: &PropertyKey, desc: PropertyDescriptor) -> Result<bool>;

    /// Whether the property exists on this object or its prototype chain.
    fn has_property(&self, key: &PropertyKey) -> Result<bool>;

    /// Read a property; accessors run against `receiver`.
    fn get(&self, key: &PropertyKey, receiver: &Value) -> Result<Value>;

    /// Write a property; accessors run against `receiver` and new data
    /// properties are created on `receiver`.
    fn set(&self, key: &PropertyKey, value: Value, receiver: &Value) -> Result<bool>;

    /// Remove an own property. Returns `false` for non-configurable ones.
    fn delete(&self, key: &PropertyKey) -> Result<bool>;

    /// Own property keys: indices ascending, then strings, then symbols,
    /// each in creation order.
    fn own_keys(&self) -> Result<Vec<PropertyKey>>;

    /// Invoke this object as a function.
    fn call(&self, _this: &Value, _args: &[Value]) -> Result<Value> {
        Err(Error::type_error(format!(
            "{} object is not a function",
            self.class()
        )))
    }

    /// Invoke this object as a constructor.
    fn construct(&self, _args: &[Value], _new_target: &ObjectRef) -> Result<Value> {
        Err(Error::type_error(format!(
            "{} object is not a constructor",
            self.class()
        )))
    }

    /// The object this one transparently forwards to, if any.
    ///
    /// Must answer without running any trap or application code; prototype
    /// cycle checks use it to see through wrappers.
    fn forwarding_target(&self) -> Option<ObjectRef> {
        None
    }

    /// Downcasting support.
    fn as_any(&self) -> &dyn Any;
}
