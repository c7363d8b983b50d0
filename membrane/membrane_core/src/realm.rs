//! A realm: a set of intrinsic prototypes plus factories for new objects.
//!
//! Each graph in a membrane normally has its own realm, so a dry array and
//! a wet array have distinct `Array.prototype` objects.

use std::sync::Arc;

use crate::builtins;
use crate::error::{Error, Result};
use crate::id::RealmId;
use crate::object::{InternalSlot, NativeFn, ObjectRef, OrdinaryObject, WeakObjectRef};
use crate::types::{ObjectClass, PropertyDescriptor, Value};

/// Intrinsic prototypes and object factories.
#[derive(Debug, Clone)]
pub struct Realm {
    id: RealmId,
    object_prototype: ObjectRef,
    function_prototype: ObjectRef,
    array_prototype: ObjectRef,
    date_prototype: ObjectRef,
    regexp_prototype: ObjectRef,
    error_prototype: ObjectRef,
}

fn native(body: impl Fn(&Value, &[Value]) -> Result<Value> + Send + Sync + 'static) -> NativeFn {
    Arc::new(body)
}

fn this_object(this: &Value, method: &str) -> Result<ObjectRef> {
    this.as_object().cloned().ok_or_else(|| {
        Error::type_error(format!("{} called on non-object", method))
    })
}

/// An array allocator that does not keep the prototype alive.
fn array_factory(prototype: &WeakObjectRef) -> impl Fn() -> ObjectRef + '_ {
    move || ObjectRef::new(OrdinaryObject::new(ObjectClass::Array, prototype.upgrade()))
}

impl Realm {
    /// Create a realm with fresh intrinsics.
    pub fn new() -> Self {
        let object_prototype = ObjectRef::new(OrdinaryObject::new(ObjectClass::Object, None));
        let function_prototype = ObjectRef::new(OrdinaryObject::function(
            native(|_, _| Ok(Value::Undefined)),
            false,
            Some(object_prototype.clone()),
        ));
        let array_prototype = ObjectRef::new(OrdinaryObject::new(
            ObjectClass::Array,
            Some(object_prototype.clone()),
        ));
        let date_prototype =
            ObjectRef::new(OrdinaryObject::new(ObjectClass::Object, Some(object_prototype.clone())));
        let regexp_prototype =
            ObjectRef::new(OrdinaryObject::new(ObjectClass::Object, Some(object_prototype.clone())));
        let error_prototype =
            ObjectRef::new(OrdinaryObject::new(ObjectClass::Object, Some(object_prototype.clone())));

        let realm = Self {
            id: RealmId::new(),
            object_prototype,
            function_prototype,
            array_prototype,
            date_prototype,
            regexp_prototype,
            error_prototype,
        };
        realm.install_intrinsics();
        realm
    }

    fn install_method(&self, target: &ObjectRef, name: &str, body: NativeFn) {
        let method = self.native_function(body, false);
        // Fresh, extensible prototype objects always accept new methods.
        let _ = target.define_own_property(name, PropertyDescriptor::data(method, true, false, true));
    }

    fn install_intrinsics(&self) {
        let splice_prototype = self.array_prototype.downgrade();
        self.install_method(
            &self.array_prototype,
            "splice",
            native(move |this, args| {
                let object = this_object(this, "Array.prototype.splice")?;
                let removed = builtins::splice(
                    &object,
                    args.first(),
                    args.get(1),
                    args.get(2..).unwrap_or_default(),
                    array_factory(&splice_prototype),
                )?;
                Ok(removed.to_value())
            }),
        );
        self.install_method(
            &self.array_prototype,
            "push",
            native(|this, args| {
                let object = this_object(this, "Array.prototype.push")?;
                Ok(Value::from(builtins::push(&object, args)? as f64))
            }),
        );

        self.install_method(
            &self.date_prototype,
            "getTime",
            native(|this, _| match date_value(this) {
                Some(time) => Ok(Value::from(time)),
                None => Err(Error::type_error("this is not a Date object")),
            }),
        );

        self.install_method(
            &self.regexp_prototype,
            "toString",
            native(|this, _| match this.as_object().and_then(regexp_parts) {
                Some((source, flags)) => Ok(Value::from(format!("/{}/{}", source, flags))),
                None => Err(Error::type_error("this is not a RegExp object")),
            }),
        );

        let _ = self
            .error_prototype
            .define_own_property("name", PropertyDescriptor::data("Error", true, false, true));
        let _ = self
            .error_prototype
            .define_own_property("message", PropertyDescriptor::data("", true, false, true));
    }

    /// The identity of this realm.
    pub fn id(&self) -> RealmId {
        self.id
    }

    /// `Object.prototype`.
    pub fn object_prototype(&self) -> &ObjectRef {
        &self.object_prototype
    }

    /// `Function.prototype`.
    pub fn function_prototype(&self) -> &ObjectRef {
        &self.function_prototype
    }

    /// `Array.prototype`, carrying `splice` and `push`.
    pub fn array_prototype(&self) -> &ObjectRef {
        &self.array_prototype
    }

    /// `Date.prototype`, carrying `getTime`.
    pub fn date_prototype(&self) -> &ObjectRef {
        &self.date_prototype
    }

    /// `RegExp.prototype`.
    pub fn regexp_prototype(&self) -> &ObjectRef {
        &self.regexp_prototype
    }

    /// `Error.prototype`.
    pub fn error_prototype(&self) -> &ObjectRef {
        &self.error_prototype
    }

    /// A new plain object inheriting from `Object.prototype`.
    pub fn object(&self) -> ObjectRef {
        self.object_with_proto(Some(self.object_prototype.clone()))
    }

    /// A new plain object with an explicit prototype.
    pub fn object_with_proto(&self, prototype: Option<ObjectRef>) -> ObjectRef {
        ObjectRef::new(OrdinaryObject::new(ObjectClass::Object, prototype))
    }

    /// A new empty array.
    pub fn array(&self) -> ObjectRef {
        ObjectRef::new(OrdinaryObject::new(
            ObjectClass::Array,
            Some(self.array_prototype.clone()),
        ))
    }

    /// A new array holding `values`.
    pub fn array_from<I>(&self, values: I) -> ObjectRef
    where
        I: IntoIterator<Item = Value>,
    {
        let array = self.array();
        for (index, value) in values.into_iter().enumerate() {
            // A fresh array is extensible with a writable length.
            let _ = array.define_own_property(index, PropertyDescriptor::plain(value));
        }
        array
    }

    fn native_function(&self, body: NativeFn, constructor: bool) -> ObjectRef {
        ObjectRef::new(OrdinaryObject::function(
            body,
            constructor,
            Some(self.function_prototype.clone()),
        ))
    }

    /// A new function.
    pub fn function<F>(&self, body: F) -> ObjectRef
    where
        F: Fn(&Value, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.native_function(Arc::new(body), false)
    }

    /// A new constructor with a fresh `prototype` object.
    pub fn constructor<F>(&self, body: F) -> ObjectRef
    where
        F: Fn(&Value, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        let function = self.native_function(Arc::new(body), true);
        let prototype = self.object();
        let _ = prototype.define_own_property(
            "constructor",
            PropertyDescriptor::data(function.clone(), true, false, true),
        );
        let _ = function.define_own_property(
            "prototype",
            PropertyDescriptor::data(prototype, true, false, false),
        );
        function
    }

    /// A new date with the given time value in milliseconds.
    pub fn date(&self, time: f64) -> ObjectRef {
        ObjectRef::new(OrdinaryObject::with_slot(
            ObjectClass::Date,
            Some(self.date_prototype.clone()),
            InternalSlot::Date(time),
        ))
    }

    /// A new regular expression.
    pub fn regexp(&self, source: &str, flags: &str) -> ObjectRef {
        let regexp = ObjectRef::new(OrdinaryObject::with_slot(
            ObjectClass::RegExp,
            Some(self.regexp_prototype.clone()),
            InternalSlot::RegExp {
                source: source.to_string(),
                flags: flags.to_string(),
            },
        ));
        let _ = regexp.define_own_property(
            "lastIndex",
            PropertyDescriptor::data(0, true, false, false),
        );
        regexp
    }

    /// A new error object with the given message.
    pub fn error(&self, message: &str) -> ObjectRef {
        let error = ObjectRef::new(OrdinaryObject::new(
            ObjectClass::Error,
            Some(self.error_prototype.clone()),
        ));
        let _ = error.define_own_property(
            "message",
            PropertyDescriptor::data(message, true, false, true),
        );
        error
    }
}

impl Default for Realm {
    fn default() -> Self {
        Self::new()
    }
}

fn date_value(this: &Value) -> Option<f64> {
    match this.as_object()?.downcast_ref::<OrdinaryObject>()?.slot() {
        InternalSlot::Date(time) => Some(*time),
        _ => None,
    }
}

fn regexp_parts(object: &ObjectRef) -> Option<(String, String)> {
    match object.downcast_ref::<OrdinaryObject>()?.slot() {
        InternalSlot::RegExp { source, flags } => Some((source.clone(), flags.clone())),
        _ => None,
    }
}
