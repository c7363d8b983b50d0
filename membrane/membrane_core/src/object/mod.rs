//! Object handles and the ordinary object implementation.

pub mod ordinary;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use crate::error::Result;
use crate::id::ObjectId;
use crate::traits::ObjectOps;
use crate::types::{ObjectClass, PropertyDescriptor, PropertyKey, Value};

pub use ordinary::{InternalSlot, NativeFn, OrdinaryObject};

/// A shared handle to an object.
///
/// Handles compare and hash by object identity. Cloning a handle never
/// copies the object.
#[derive(Clone)]
pub struct ObjectRef(Arc<dyn ObjectOps>);

impl ObjectRef {
    /// Allocate a handle for an object implementation.
    pub fn new<T: ObjectOps>(ops: T) -> Self {
        Self(Arc::new(ops))
    }

    /// The identity of the object.
    pub fn id(&self) -> ObjectId {
        self.0.id()
    }

    /// The built-in class of the object.
    pub fn class(&self) -> ObjectClass {
        self.0.class()
    }

    /// Whether the object can be called.
    pub fn is_callable(&self) -> bool {
        self.0.is_callable()
    }

    /// Whether the object can be constructed.
    pub fn is_constructor(&self) -> bool {
        self.0.is_constructor()
    }

    /// The dispatch table of the object.
    pub fn ops(&self) -> &dyn ObjectOps {
        self.0.as_ref()
    }

    /// Downcast to a concrete implementation.
    pub fn downcast_ref<T: ObjectOps>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Create a weak handle that does not keep the object alive.
    pub fn downgrade(&self) -> WeakObjectRef {
        WeakObjectRef(Arc::downgrade(&self.0))
    }

    /// This handle as a value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.clone())
    }

    /// Read a property with this object as the receiver.
    pub fn get(&self, key: impl Into<PropertyKey>) -> Result<Value> {
        self.0.get(&key.into(), &self.to_value())
    }

    /// Read a property with an explicit receiver.
    pub fn get_with_receiver(&self, key: impl Into<PropertyKey>, receiver: &Value) -> Result<Value> {
        self.0.get(&key.into(), receiver)
    }

    /// Write a property with this object as the receiver.
    pub fn set(&self, key: impl Into<PropertyKey>, value: impl Into<Value>) -> Result<bool> {
        self.0.set(&key.into(), value.into(), &self.to_value())
    }

    /// Write a property with an explicit receiver.
    pub fn set_with_receiver(
        &self,
        key: impl Into<PropertyKey>,
        value: impl Into<Value>,
        receiver: &Value,
    ) -> Result<bool> {
        self.0.set(&key.into(), value.into(), receiver)
    }

    /// Whether the property exists here or on the prototype chain.
    pub fn has(&self, key: impl Into<PropertyKey>) -> Result<bool> {
        self.0.has_property(&key.into())
    }

    /// Whether the property is an own property.
    pub fn has_own(&self, key: impl Into<PropertyKey>) -> Result<bool> {
        Ok(self.0.get_own_property(&key.into())?.is_some())
    }

    /// Delete an own property.
    pub fn delete(&self, key: impl Into<PropertyKey>) -> Result<bool> {
        self.0.delete(&key.into())
    }

    /// Define an own property.
    pub fn define_own_property(
        &self,
        key: impl Into<PropertyKey>,
        desc: PropertyDescriptor,
    ) -> Result<bool> {
        self.0.define_own_property(&key.into(), desc)
    }

    /// The descriptor of an own property.
    pub fn get_own_property(&self, key: impl Into<PropertyKey>) -> Result<Option<PropertyDescriptor>> {
        self.0.get_own_property(&key.into())
    }

    /// Own property keys.
    pub fn own_keys(&self) -> Result<Vec<PropertyKey>> {
        self.0.own_keys()
    }

    /// The prototype link.
    pub fn prototype(&self) -> Result<Option<ObjectRef>> {
        self.0.get_prototype_of()
    }

    /// Replace the prototype link.
    pub fn set_prototype(&self, prototype: Option<ObjectRef>) -> Result<bool> {
        self.0.set_prototype_of(prototype)
    }

    /// Whether new properties may be added.
    pub fn is_extensible(&self) -> Result<bool> {
        self.0.is_extensible()
    }

    /// Forbid new properties.
    pub fn prevent_extensions(&self) -> Result<bool> {
        self.0.prevent_extensions()
    }

    /// Call the object as a function.
    pub fn call(&self, this: &Value, args: &[Value]) -> Result<Value> {
        self.0.call(this, args)
    }

    /// Construct a new instance with this object as the new target.
    pub fn construct(&self, args: &[Value]) -> Result<Value> {
        self.0.construct(args, self)
    }

    /// Read a method and call it with this object as `this`.
    pub fn invoke(&self, key: impl Into<PropertyKey>, args: &[Value]) -> Result<Value> {
        let key = key.into();
        let this = self.to_value();
        match self.0.get(&key, &this)? {
            Value::Object(method) => method.call(&this, args),
            _ => Err(crate::error::Error::type_error(format!(
                "{} is not a function",
                key
            ))),
        }
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for ObjectRef {}

impl Hash for ObjectRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({} {})", self.class(), self.id())
    }
}

/// A weak handle to an object.
#[derive(Clone)]
pub struct WeakObjectRef(Weak<dyn ObjectOps>);

impl WeakObjectRef {
    /// Recover a strong handle if the object is still alive.
    pub fn upgrade(&self) -> Option<ObjectRef> {
        self.0.upgrade().map(ObjectRef)
    }

    /// Whether the object is still alive.
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

impl fmt::Debug for WeakObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(obj) => write!(f, "WeakObjectRef({:?})", obj),
            None => f.write_str("WeakObjectRef(<dropped>)"),
        }
    }
}
