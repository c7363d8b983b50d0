//! Ordinary objects: plain objects, arrays, functions, dates and regexps.
//!
//! State lives behind a `parking_lot::RwLock`. Every algorithm clones what
//! it needs out of the lock and releases it before touching any other
//! object, so getters, setters and prototype walks may freely re-enter.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use super::ObjectRef;
use crate::error::{Error, Result};
use crate::id::ObjectId;
use crate::log_event;
use crate::traits::ObjectOps;
use crate::types::{ObjectClass, PropertyDescriptor, PropertyKey, Value};

/// A native function body: `(this, args) -> result`.
pub type NativeFn = Arc<dyn Fn(&Value, &[Value]) -> Result<Value> + Send + Sync + 'static>;

/// Built-in state carried by dates and regular expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum InternalSlot {
    /// No built-in state.
    None,
    /// A date's time value in milliseconds since the epoch.
    Date(f64),
    /// A regular expression's source text and flags.
    RegExp {
        /// The pattern source.
        source: String,
        /// The flags, e.g. `"gi"`.
        flags: String,
    },
}

#[derive(Clone)]
struct FunctionBehavior {
    body: NativeFn,
    constructor: bool,
}

struct ObjectState {
    prototype: Option<ObjectRef>,
    extensible: bool,
    properties: IndexMap<PropertyKey, PropertyDescriptor>,
}

/// An object with ordinary semantics for every fundamental operation.
///
/// Arrays additionally keep `length` in step with their indices, and
/// functions carry a native body.
pub struct OrdinaryObject {
    id: ObjectId,
    class: ObjectClass,
    slot: InternalSlot,
    function: Option<FunctionBehavior>,
    state: RwLock<ObjectState>,
}

fn length_key() -> PropertyKey {
    PropertyKey::from("length")
}

impl OrdinaryObject {
    /// Create an empty, extensible object.
    pub fn new(class: ObjectClass, prototype: Option<ObjectRef>) -> Self {
        Self::with_slot(class, prototype, InternalSlot::None)
    }

    /// Create an empty object carrying built-in state.
    pub fn with_slot(class: ObjectClass, prototype: Option<ObjectRef>, slot: InternalSlot) -> Self {
        let mut properties = IndexMap::new();
        if class == ObjectClass::Array {
            properties.insert(length_key(), PropertyDescriptor::data(0, true, false, false));
        }
        Self {
            id: ObjectId::next(),
            class,
            slot,
            function: None,
            state: RwLock::new(ObjectState {
                prototype,
                extensible: true,
                properties,
            }),
        }
    }

    /// Create a function object.
    pub fn function(body: NativeFn, constructor: bool, prototype: Option<ObjectRef>) -> Self {
        let mut object = Self::new(ObjectClass::Function, prototype);
        object.function = Some(FunctionBehavior { body, constructor });
        object
    }

    /// The built-in state of this object.
    pub fn slot(&self) -> &InternalSlot {
        &self.slot
    }

    fn validate_and_apply(
        state: &mut ObjectState,
        key: &PropertyKey,
        desc: PropertyDescriptor,
    ) -> bool {
        let Some(current) = state.properties.get(key) else {
            if !state.extensible {
                return false;
            }
            state.properties.insert(key.clone(), desc.complete());
            return true;
        };

        let kind_change = !desc.is_generic() && desc.is_accessor() != current.is_accessor();

        if !current.is_configurable() {
            if desc.configurable == Some(true) {
                return false;
            }
            if desc.enumerable.is_some_and(|e| e != current.is_enumerable()) {
                return false;
            }
            if kind_change {
                return false;
            }
            if current.is_accessor() {
                let getter_changes = desc
                    .get
                    .as_ref()
                    .is_some_and(|g| !current.get.as_ref().is_some_and(|c| g.same_value(c)));
                let setter_changes = desc
                    .set
                    .as_ref()
                    .is_some_and(|s| !current.set.as_ref().is_some_and(|c| s.same_value(c)));
                if getter_changes || setter_changes {
                    return false;
                }
            } else if !current.is_writable() {
                if desc.writable == Some(true) {
                    return false;
                }
                let value_changes = desc
                    .value
                    .as_ref()
                    .is_some_and(|v| !current.value.as_ref().is_some_and(|c| v.same_value(c)));
                if value_changes {
                    return false;
                }
            }
        }

        let mut next = if kind_change {
            if desc.is_accessor() {
                PropertyDescriptor::accessor(
                    Value::Undefined,
                    Value::Undefined,
                    current.is_enumerable(),
                    current.is_configurable(),
                )
            } else {
                PropertyDescriptor::data(
                    Value::Undefined,
                    false,
                    current.is_enumerable(),
                    current.is_configurable(),
                )
            }
        } else {
            current.clone()
        };

        if desc.value.is_some() {
            next.value = desc.value;
        }
        if desc.writable.is_some() {
            next.writable = desc.writable;
        }
        if desc.get.is_some() {
            next.get = desc.get;
        }
        if desc.set.is_some() {
            next.set = desc.set;
        }
        if desc.enumerable.is_some() {
            next.enumerable = desc.enumerable;
        }
        if desc.configurable.is_some() {
            next.configurable = desc.configurable;
        }

        state.properties.insert(key.clone(), next);
        true
    }

    fn current_length(state: &ObjectState) -> (u32, bool) {
        match state.properties.get(&length_key()) {
            Some(desc) => {
                let length = desc
                    .value
                    .as_ref()
                    .and_then(Value::as_number)
                    .unwrap_or(0.0);
                (length as u32, desc.is_writable())
            }
            None => (0, true),
        }
    }

    fn define_array_length(state: &mut ObjectState, mut desc: PropertyDescriptor) -> Result<bool> {
        let key = length_key();
        let Some(value) = desc.value.clone() else {
            return Ok(Self::validate_and_apply(state, &key, desc));
        };

        let number = value.to_number()?;
        let new_length = number as u32;
        if f64::from(new_length) != number {
            return Err(Error::type_error(format!("Invalid array length: {}", value)));
        }
        desc.value = Some(Value::from(new_length));

        let (old_length, old_writable) = Self::current_length(state);
        if new_length >= old_length {
            return Ok(Self::validate_and_apply(state, &key, desc));
        }
        if !old_writable {
            return Ok(false);
        }

        // Freezing `length` is deferred until the truncation is done.
        let new_writable = desc.writable != Some(false);
        if !new_writable {
            desc.writable = Some(true);
        }
        if !Self::validate_and_apply(state, &key, desc) {
            return Ok(false);
        }

        let mut doomed: Vec<u32> = state
            .properties
            .keys()
            .filter_map(PropertyKey::as_array_index)
            .filter(|index| *index >= new_length)
            .collect();
        doomed.sort_unstable_by(|a, b| b.cmp(a));

        for index in doomed {
            let index_key = PropertyKey::from(index);
            let configurable = state
                .properties
                .get(&index_key)
                .is_some_and(PropertyDescriptor::is_configurable);
            if !configurable {
                let mut stuck = PropertyDescriptor::value_only(index + 1);
                if !new_writable {
                    stuck.writable = Some(false);
                }
                Self::validate_and_apply(state, &key, stuck);
                return Ok(false);
            }
            state.properties.shift_remove(&index_key);
        }

        if !new_writable {
            let freeze = PropertyDescriptor {
                writable: Some(false),
                ..PropertyDescriptor::default()
            };
            Self::validate_and_apply(state, &key, freeze);
        }
        Ok(true)
    }

    fn define_locked(
        &self,
        state: &mut ObjectState,
        key: &PropertyKey,
        desc: PropertyDescriptor,
    ) -> Result<bool> {
        if self.class != ObjectClass::Array {
            return Ok(Self::validate_and_apply(state, key, desc));
        }
        if key.as_str() == Some("length") {
            return Self::define_array_length(state, desc);
        }
        let Some(index) = key.as_array_index() else {
            return Ok(Self::validate_and_apply(state, key, desc));
        };

        let (length, length_writable) = Self::current_length(state);
        if index >= length && !length_writable {
            return Ok(false);
        }
        if !Self::validate_and_apply(state, key, desc) {
            return Ok(false);
        }
        if index >= length {
            Self::validate_and_apply(state, &length_key(), PropertyDescriptor::value_only(index + 1));
        }
        Ok(true)
    }
}

impl fmt::Debug for OrdinaryObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrdinaryObject")
            .field("id", &self.id)
            .field("class", &self.class)
            .field("slot", &self.slot)
            .finish_non_exhaustive()
    }
}

impl ObjectOps for OrdinaryObject {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn class(&self) -> ObjectClass {
        self.class
    }

    fn is_callable(&self) -> bool {
        self.function.is_some()
    }

    fn is_constructor(&self) -> bool {
        self.function.as_ref().is_some_and(|f| f.constructor)
    }

    fn get_prototype_of(&self) -> Result<Option<ObjectRef>> {
        Ok(self.state.read().prototype.clone())
    }

    fn set_prototype_of(&self, prototype: Option<ObjectRef>) -> Result<bool> {
        {
            let state = self.state.read();
            if state.prototype == prototype {
                return Ok(true);
            }
            if !state.extensible {
                return Ok(false);
            }
        }

        // Forwarding objects are seen through; any other non-ordinary
        // object ends the cycle check.
        let mut cursor = prototype.clone();
        while let Some(mut link) = cursor {
            while let Some(target) = link.ops().forwarding_target() {
                link = target;
            }
            if link.id() == self.id {
                log_event!(
                    LogLevel::Debug,
                    "Rejected prototype cycle",
                    object => self.id,
                );
                return Ok(false);
            }
            if link.downcast_ref::<OrdinaryObject>().is_none() {
                break;
            }
            cursor = link.prototype()?;
        }

        let mut state = self.state.write();
        if !state.extensible {
            return Ok(false);
        }
        state.prototype = prototype;
        Ok(true)
    }

    fn is_extensible(&self) -> Result<bool> {
        Ok(self.state.read().extensible)
    }

    fn prevent_extensions(&self) -> Result<bool> {
        self.state.write().extensible = false;
        Ok(true)
    }

    fn get_own_property(&self, key: &PropertyKey) -> Result<Option<PropertyDescriptor>> {
        Ok(self.state.read().properties.get(key).cloned())
    }

    fn define_own_property(&self, key: &PropertyKey, desc: PropertyDescriptor) -> Result<bool> {
        let mut state = self.state.write();
        self.define_locked(&mut state, key, desc)
    }

    fn has_property(&self, key: &PropertyKey) -> Result<bool> {
        let prototype = {
            let state = self.state.read();
            if state.properties.contains_key(key) {
                return Ok(true);
            }
            state.prototype.clone()
        };
        match prototype {
            Some(prototype) => prototype.has(key),
            None => Ok(false),
        }
    }

    fn get(&self, key: &PropertyKey, receiver: &Value) -> Result<Value> {
        let (own, prototype) = {
            let state = self.state.read();
            (state.properties.get(key).cloned(), state.prototype.clone())
        };

        match own {
            None => match prototype {
                Some(prototype) => prototype.get_with_receiver(key, receiver),
                None => Ok(Value::Undefined),
            },
            Some(desc) if desc.is_accessor() => match desc.get {
                Some(Value::Object(getter)) => getter.call(receiver, &[]),
                _ => Ok(Value::Undefined),
            },
            Some(desc) => Ok(desc.value.unwrap_or_default()),
        }
    }

    fn set(&self, key: &PropertyKey, value: Value, receiver: &Value) -> Result<bool> {
        let (own, prototype) = {
            let state = self.state.read();
            (state.properties.get(key).cloned(), state.prototype.clone())
        };

        let own = match own {
            Some(desc) => desc,
            None => match prototype {
                Some(prototype) => return prototype.set_with_receiver(key, value, receiver),
                None => PropertyDescriptor::plain(Value::Undefined),
            },
        };

        if own.is_accessor() {
            return match own.set {
                Some(Value::Object(setter)) => {
                    setter.call(receiver, &[value])?;
                    Ok(true)
                }
                _ => Ok(false),
            };
        }

        if !own.is_writable() {
            return Ok(false);
        }
        let Value::Object(target) = receiver else {
            return Ok(false);
        };
        match target.get_own_property(key)? {
            Some(existing) => {
                if existing.is_accessor() || !existing.is_writable() {
                    return Ok(false);
                }
                target.define_own_property(key, PropertyDescriptor::value_only(value))
            }
            None => target.define_own_property(key, PropertyDescriptor::plain(value)),
        }
    }

    fn delete(&self, key: &PropertyKey) -> Result<bool> {
        let mut state = self.state.write();
        match state.properties.get(key) {
            None => Ok(true),
            Some(desc) if desc.is_configurable() => {
                state.properties.shift_remove(key);
                Ok(true)
            }
            Some(_) => Ok(false),
        }
    }

    fn own_keys(&self) -> Result<Vec<PropertyKey>> {
        let state = self.state.read();
        let mut indices: Vec<u32> = state
            .properties
            .keys()
            .filter_map(PropertyKey::as_array_index)
            .collect();
        indices.sort_unstable();

        let mut keys: Vec<PropertyKey> = indices.into_iter().map(PropertyKey::from).collect();
        keys.extend(
            state
                .properties
                .keys()
                .filter(|key| !key.is_symbol() && key.as_array_index().is_none())
                .cloned(),
        );
        keys.extend(state.properties.keys().filter(|key| key.is_symbol()).cloned());
        Ok(keys)
    }

    fn call(&self, this: &Value, args: &[Value]) -> Result<Value> {
        match &self.function {
            Some(function) => (function.body)(this, args),
            None => Err(Error::type_error(format!(
                "{} object is not a function",
                self.class
            ))),
        }
    }

    fn construct(&self, args: &[Value], new_target: &ObjectRef) -> Result<Value> {
        let Some(function) = self.function.as_ref().filter(|f| f.constructor) else {
            return Err(Error::type_error(format!(
                "{} object is not a constructor",
                self.class
            )));
        };

        let prototype = new_target.get("prototype")?.into_object();
        let instance = ObjectRef::new(OrdinaryObject::new(ObjectClass::Object, prototype));
        let this = instance.to_value();
        match (function.body)(&this, args)? {
            result @ Value::Object(_) => Ok(result),
            _ => Ok(this),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
