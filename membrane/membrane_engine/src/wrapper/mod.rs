//! The wrapper trap engine.
//!
//! A [`Wrapper`] stands in for a target object of a source graph inside a
//! destination graph. Every fundamental operation first consults the
//! revocation guard, then translates its inputs from the destination graph
//! into the source graph, forwards to the target, and translates the result
//! (including thrown values) back.

mod invariants;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use membrane_core::id::{GraphName, ObjectId};
use membrane_core::{
    Error, LogLevel, ObjectClass, ObjectOps, ObjectRef, PropertyDescriptor, PropertyKey, Result,
    Value,
};
use tracing::trace;

use crate::membrane::MembraneShared;
use crate::revocation::RevocationGuard;

/// An object standing in for a value of another graph.
pub struct Wrapper {
    /// The wrapper's own identity
    id: ObjectId,

    /// The wrapped value, in its source graph
    target: ObjectRef,

    /// The graph the target lives in
    source_graph: GraphName,

    /// The graph this wrapper lives in
    destination_graph: GraphName,

    /// Flags that sever this wrapper
    guard: RevocationGuard,

    /// The membrane that issued this wrapper
    membrane: Arc<MembraneShared>,
}

impl Wrapper {
    pub(crate) fn new(
        target: ObjectRef,
        source_graph: GraphName,
        destination_graph: GraphName,
        guard: RevocationGuard,
        membrane: Arc<MembraneShared>,
    ) -> Self {
        Self {
            id: ObjectId::next(),
            target,
            source_graph,
            destination_graph,
            guard,
            membrane,
        }
    }

    /// The graph the wrapped value lives in.
    pub fn source_graph(&self) -> &GraphName {
        &self.source_graph
    }

    /// The graph this wrapper lives in.
    pub fn destination_graph(&self) -> &GraphName {
        &self.destination_graph
    }

    /// Whether this wrapper has been severed.
    pub fn is_revoked(&self) -> bool {
        self.guard.is_revoked()
    }

    fn enter(&self, trap: &'static str) -> Result<()> {
        self.guard.check()?;
        let config = &self.membrane.config;
        if config.trace_traps && config.logs_at(LogLevel::Trace) {
            trace!(
                trap,
                wrapper = %self.id,
                from = %self.source_graph,
                to = %self.destination_graph,
                "Trap invoked"
            );
        }
        Ok(())
    }

    fn to_source(&self, value: Value) -> Result<Value> {
        self.membrane
            .convert(value, &self.destination_graph, &self.source_graph)
    }

    fn to_destination(&self, value: Value) -> Result<Value> {
        self.membrane
            .convert(value, &self.source_graph, &self.destination_graph)
    }

    fn prototype_to_destination(&self, prototype: Option<ObjectRef>) -> Result<Option<ObjectRef>> {
        Ok(self.to_destination(Value::from(prototype))?.into_object())
    }

    /// Map a receiver into the source graph: wrappers of source-graph values
    /// are unwrapped, anything else is passed through untouched.
    fn translate_receiver(&self, receiver: &Value) -> Value {
        match receiver {
            Value::Object(object) if object.id() == self.id => self.target.to_value(),
            Value::Object(object) => match self.membrane.identity.unwrap(object) {
                Some((origin, source)) if origin == self.source_graph => source.to_value(),
                _ => receiver.clone(),
            },
            _ => receiver.clone(),
        }
    }

    /// Carry a thrown value back into the destination graph.
    fn translate_error(&self, err: Error) -> Error {
        match err {
            Error::Thrown(value) => match self.to_destination(value) {
                Ok(value) => Error::Thrown(value),
                Err(err) => err,
            },
            other => other,
        }
    }

    fn to_source_args(&self, args: &[Value]) -> Result<Vec<Value>> {
        args.iter()
            .map(|arg| self.to_source(arg.clone()))
            .collect()
    }
}

impl fmt::Debug for Wrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wrapper")
            .field("id", &self.id)
            .field("class", &self.target.class())
            .field("source_graph", &self.source_graph)
            .field("destination_graph", &self.destination_graph)
            .field("revoked", &self.guard.is_revoked())
            .finish()
    }
}

impl ObjectOps for Wrapper {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn class(&self) -> ObjectClass {
        self.target.class()
    }

    fn is_callable(&self) -> bool {
        self.target.is_callable()
    }

    fn is_constructor(&self) -> bool {
        self.target.is_constructor()
    }

    fn get_prototype_of(&self) -> Result<Option<ObjectRef>> {
        self.enter("getPrototypeOf")?;
        let prototype = self
            .target
            .prototype()
            .map_err(|err| self.translate_error(err))?;
        self.prototype_to_destination(prototype)
    }

    fn set_prototype_of(&self, prototype: Option<ObjectRef>) -> Result<bool> {
        self.enter("setPrototypeOf")?;
        let prototype = self.to_source(Value::from(prototype))?.into_object();
        self.target
            .set_prototype(prototype)
            .map_err(|err| self.translate_error(err))
    }

    fn is_extensible(&self) -> Result<bool> {
        self.enter("isExtensible")?;
        self.target
            .is_extensible()
            .map_err(|err| self.translate_error(err))
    }

    fn prevent_extensions(&self) -> Result<bool> {
        self.enter("preventExtensions")?;
        let done = self
            .target
            .prevent_extensions()
            .map_err(|err| self.translate_error(err))?;
        if done {
            invariants::check_prevent_extensions(&self.target)?;
        }
        Ok(done)
    }

    fn get_own_property(&self, key: &PropertyKey) -> Result<Option<PropertyDescriptor>> {
        self.enter("getOwnPropertyDescriptor")?;
        let desc = self
            .target
            .get_own_property(key)
            .map_err(|err| self.translate_error(err))?;
        desc.map(|desc| desc.try_map_values(|value| self.to_destination(value)))
            .transpose()
    }

    fn define_own_property(&self, key: &PropertyKey, desc: PropertyDescriptor) -> Result<bool> {
        self.enter("defineProperty")?;
        let translated = desc
            .clone()
            .try_map_values(|value| self.to_source(value))?;
        let done = self
            .target
            .define_own_property(key, translated)
            .map_err(|err| self.translate_error(err))?;
        if done {
            invariants::check_define(&self.target, key, &desc)?;
        }
        Ok(done)
    }

    fn has_property(&self, key: &PropertyKey) -> Result<bool> {
        self.enter("has")?;
        self.target.has(key).map_err(|err| self.translate_error(err))
    }

    fn get(&self, key: &PropertyKey, receiver: &Value) -> Result<Value> {
        self.enter("get")?;
        let receiver = self.translate_receiver(receiver);
        let value = self
            .target
            .get_with_receiver(key, &receiver)
            .map_err(|err| self.translate_error(err))?;
        self.to_destination(value)
    }

    fn set(&self, key: &PropertyKey, value: Value, receiver: &Value) -> Result<bool> {
        self.enter("set")?;
        let receiver = self.translate_receiver(receiver);
        let value = self.to_source(value)?;
        self.target
            .set_with_receiver(key, value, &receiver)
            .map_err(|err| self.translate_error(err))
    }

    fn delete(&self, key: &PropertyKey) -> Result<bool> {
        self.enter("deleteProperty")?;
        self.target
            .delete(key)
            .map_err(|err| self.translate_error(err))
    }

    fn own_keys(&self) -> Result<Vec<PropertyKey>> {
        self.enter("ownKeys")?;
        self.target.own_keys().map_err(|err| self.translate_error(err))
    }

    fn call(&self, this: &Value, args: &[Value]) -> Result<Value> {
        self.enter("apply")?;
        let this = self.to_source(this.clone())?;
        let args = self.to_source_args(args)?;
        let result = self
            .target
            .call(&this, &args)
            .map_err(|err| self.translate_error(err))?;
        self.to_destination(result)
    }

    fn construct(&self, args: &[Value], new_target: &ObjectRef) -> Result<Value> {
        self.enter("construct")?;
        let args = self.to_source_args(args)?;
        let new_target = if new_target.id() == self.id {
            self.target.clone()
        } else {
            match self.to_source(new_target.to_value())? {
                Value::Object(object) => object,
                _ => self.target.clone(),
            }
        };
        let instance = self
            .target
            .ops()
            .construct(&args, &new_target)
            .map_err(|err| self.translate_error(err))?;
        self.to_destination(instance)
    }

    fn forwarding_target(&self) -> Option<ObjectRef> {
        Some(self.target.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
