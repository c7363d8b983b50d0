//! Integration tests for membrane crossings and revocation.

mod common;

use std::any::Any;
use std::sync::{Arc, Mutex};

use common::{capture_logs, get, init_tracing, obj};
use membrane_core::builtins::{array_to_vec, object_keys};
use membrane_core::error::{Error, Result};
use membrane_core::id::{GraphName, ObjectId};
use membrane_core::{
    LogLevel, ObjectClass, ObjectOps, ObjectRef, PropertyDescriptor, PropertyKey, Realm, Value,
};
use membrane_engine::{
    classify, create_membrane, create_membrane_with_config, MembraneConfig, RevocationScope,
    ValueClass,
};

fn strings(values: &[Value]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn revoked<T>(result: Result<T>) -> bool {
    matches!(result, Err(Error::RevokedAccess))
}

/// An object whose every operation throws `payload`.
#[derive(Debug)]
struct ThrowingObject {
    id: ObjectId,
    payload: Value,
}

impl ThrowingObject {
    fn fail<T>(&self) -> Result<T> {
        Err(Error::thrown(self.payload.clone()))
    }
}

impl ObjectOps for ThrowingObject {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn class(&self) -> ObjectClass {
        ObjectClass::Object
    }

    fn get_prototype_of(&self) -> Result<Option<ObjectRef>> {
        self.fail()
    }

    fn set_prototype_of(&self, _prototype: Option<ObjectRef>) -> Result<bool> {
        self.fail()
    }

    fn is_extensible(&self) -> Result<bool> {
        self.fail()
    }

    fn prevent_extensions(&self) -> Result<bool> {
        self.fail()
    }

    fn get_own_property(&self, _key: &PropertyKey) -> Result<Option<PropertyDescriptor>> {
        self.fail()
    }

    fn define_own_property(&self, _key: &PropertyKey, _desc: PropertyDescriptor) -> Result<bool> {
        self.fail()
    }

    fn has_property(&self, _key: &PropertyKey) -> Result<bool> {
        self.fail()
    }

    fn get(&self, _key: &PropertyKey, _receiver: &Value) -> Result<Value> {
        self.fail()
    }

    fn set(&self, _key: &PropertyKey, _value: Value, _receiver: &Value) -> Result<bool> {
        self.fail()
    }

    fn delete(&self, _key: &PropertyKey) -> Result<bool> {
        self.fail()
    }

    fn own_keys(&self) -> Result<Vec<PropertyKey>> {
        self.fail()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[test]
fn test_nested_objects_are_wrapped_once() {
    init_tracing();
    let realm = Realm::new();
    let nested = realm.object();
    nested.set("a", 1).unwrap();
    let wet = realm.object();
    wet.set("nested", nested.clone()).unwrap();

    let dry = create_membrane(wet.to_value()).unwrap().membrane;
    let dry_nested = get(&dry, "nested");

    assert_ne!(dry_nested, nested.to_value());
    assert_eq!(get(&dry_nested, "a"), Value::from(1));
    assert_eq!(get(&dry, "nested"), dry_nested);
}

#[test]
fn test_functions_are_wrapped_and_revoked() {
    init_tracing();
    let realm = Realm::new();
    let identity = realm.function(|_, args| Ok(args.first().cloned().unwrap_or_default()));
    let created = create_membrane(identity.to_value()).unwrap();
    let dry = obj(&created.membrane);

    assert_ne!(created.membrane, identity.to_value());
    assert_eq!(created.membrane.type_of(), "function");
    assert_eq!(dry.call(&Value::Undefined, &[Value::from(1)]).unwrap(), Value::from(1));

    assert!(created.revoke.revoke());
    assert_eq!(
        identity.call(&Value::Undefined, &[Value::from(1)]).unwrap(),
        Value::from(1)
    );
    let err = dry.call(&Value::Undefined, &[Value::from(1)]).unwrap_err();
    assert!(err.is_revoked());
}

#[test]
fn test_revocation_invalidates_existing_wrappers() {
    let realm = Realm::new();
    let wet_a = realm.object();
    wet_a.set("x", 1).unwrap();
    let wet_b = realm.object();
    wet_b.set("y", wet_a.clone()).unwrap();

    let created = create_membrane(wet_b.to_value()).unwrap();
    let dry_b = obj(&created.membrane);
    let dry_a = obj(&dry_b.get("y").unwrap());
    assert_eq!(dry_a.get("x").unwrap(), Value::from(1));

    created.revoke.revoke();
    assert_eq!(wet_a.get("x").unwrap(), Value::from(1));
    assert_eq!(wet_b.get("y").unwrap(), wet_a.to_value());
    assert!(matches!(dry_a.get("x"), Err(Error::RevokedAccess)));
    assert!(matches!(dry_b.get("y"), Err(Error::RevokedAccess)));
    assert!(matches!(dry_b.own_keys(), Err(Error::RevokedAccess)));
    assert!(matches!(dry_b.prototype(), Err(Error::RevokedAccess)));
    assert!(matches!(dry_b.is_extensible(), Err(Error::RevokedAccess)));

    // Revocation happens before any side effect on the target.
    assert!(dry_b.set("z", 1).is_err());
    assert!(!wet_b.has_own("z").unwrap());
}

#[test]
fn test_revoke_twice_is_a_no_op() {
    let realm = Realm::new();
    let created = create_membrane(realm.object().to_value()).unwrap();
    assert!(created.revoke.revoke());
    assert!(!created.revoke.revoke());
    assert!(created.revoke.is_revoked());
    assert!(created.handle.is_revoked(created.handle.dry_graph()));
}

#[test]
fn test_method_results_are_wrapped() {
    let realm = Realm::new();
    let wet_a = realm.object();
    wet_a.set("x", 42).unwrap();
    let wet_b = realm.object();
    let returned = wet_a.clone();
    wet_b
        .set("m", realm.function(move |_, _| Ok(returned.to_value())))
        .unwrap();

    let created = create_membrane(wet_b.to_value()).unwrap();
    let dry_b = obj(&created.membrane);
    let dry_a = dry_b.invoke("m", &[]).unwrap();

    assert_ne!(dry_a, wet_a.to_value());
    assert_eq!(get(&dry_a, "x"), Value::from(42));
    assert_eq!(dry_b.invoke("m", &[]).unwrap(), dry_a);

    created.revoke.revoke();
    assert!(obj(&dry_a).get("x").unwrap_err().is_revoked());
    assert!(dry_b.invoke("m", &[]).unwrap_err().is_revoked());
}

#[test]
fn test_prototype_is_wrapped() {
    let realm = Realm::new();
    let wet_a = realm.object();
    wet_a.set("x", 42).unwrap();
    let wet_b = realm.object_with_proto(Some(wet_a.clone()));

    let created = create_membrane(wet_b.to_value()).unwrap();
    let dry_b = obj(&created.membrane);
    let dry_a = dry_b.prototype().unwrap().unwrap();

    assert_ne!(dry_a, wet_a);
    assert_eq!(dry_a.get("x").unwrap(), Value::from(42));
    assert_eq!(dry_b.get("x").unwrap(), Value::from(42));
    assert_eq!(dry_b.prototype().unwrap(), Some(dry_a.clone()));

    created.revoke.revoke();
    assert!(dry_a.get("x").unwrap_err().is_revoked());
}

#[test]
fn test_type_of_is_unchanged() {
    let realm = Realm::new();
    let wet = realm.object();
    wet.set("obj", realm.object()).unwrap();
    wet.set("arr", realm.array()).unwrap();
    wet.set("fun", realm.function(|_, _| Ok(Value::Undefined))).unwrap();
    wet.set("nbr", 1).unwrap();
    wet.set("str", "x").unwrap();
    wet.set("nul", Value::Null).unwrap();
    wet.set("udf", Value::Undefined).unwrap();
    wet.set("bln", true).unwrap();
    wet.set("rex", realm.regexp("x", "")).unwrap();
    wet.set("dat", realm.date(0.0)).unwrap();

    let dry = create_membrane(wet.to_value()).unwrap().membrane;
    for key in object_keys(&wet).unwrap() {
        let wet_value = wet.get(&key).unwrap();
        let dry_value = obj(&dry).get(&key).unwrap();
        assert_eq!(wet_value.type_of(), dry_value.type_of(), "typeof {}", key);
        assert_eq!(classify(&wet_value), classify(&dry_value), "class of {}", key);
    }
    assert_eq!(classify(&get(&dry, "arr")), ValueClass::Array);
}

#[test]
fn test_non_configurable_properties_are_observed() {
    let wet = Realm::new().object_with_proto(None);
    wet.define_own_property("x", PropertyDescriptor::data(1, true, true, false))
        .unwrap();

    let dry = obj(&create_membrane(wet.to_value()).unwrap().membrane);
    assert_eq!(dry.get("x").unwrap(), Value::from(1));

    let desc = dry.get_own_property("x").unwrap().unwrap();
    assert_eq!(desc.configurable, Some(false));
    assert_eq!(desc.value, Some(Value::from(1)));
    assert_eq!(desc.enumerable, Some(true));
    assert_eq!(desc.writable, Some(true));

    assert!(!dry.delete("x").unwrap());
    assert_eq!(dry.get("x").unwrap(), Value::from(1));
}

#[test]
fn test_non_extensibility_is_mirrored() {
    let realm = Realm::new();
    let wet = realm.object();
    wet.set("x", 1).unwrap();
    wet.prevent_extensions().unwrap();

    let dry = obj(&create_membrane(wet.to_value()).unwrap().membrane);
    assert_eq!(dry.get("x").unwrap(), Value::from(1));
    assert!(!dry.is_extensible().unwrap());
    assert_eq!(
        dry.get_own_property("x").unwrap().unwrap().value,
        Some(Value::from(1))
    );
    assert!(dry.has("x").unwrap());
    assert!(dry.has_own("x").unwrap());
    assert!(!dry.set("y", 2).unwrap());
}

#[test]
fn test_prevent_extensions_from_the_dry_side() {
    let realm = Realm::new();
    let wet = realm.object();
    let dry = obj(&create_membrane(wet.to_value()).unwrap().membrane);

    assert!(dry.is_extensible().unwrap());
    assert!(dry.prevent_extensions().unwrap());
    assert!(!dry.is_extensible().unwrap());
    assert!(!wet.is_extensible().unwrap());
    assert!(dry.prevent_extensions().unwrap());
}

#[test]
fn test_assignment_reaches_the_target() {
    let realm = Realm::new();
    let wet = realm.object();
    wet.set("x", 1).unwrap();
    let created = create_membrane(wet.to_value()).unwrap();
    let dry = obj(&created.membrane);

    assert!(dry
        .define_own_property("y", PropertyDescriptor::plain(2))
        .unwrap());
    assert_eq!(dry.get("y").unwrap(), Value::from(2));
    assert_eq!(wet.get("y").unwrap(), Value::from(2));

    assert!(dry.set("x", 2).unwrap());
    assert_eq!(dry.get("x").unwrap(), Value::from(2));

    created.revoke.revoke();
    assert!(dry.set("x", 3).unwrap_err().is_revoked());
    assert_eq!(wet.get("x").unwrap(), Value::from(2));
}

#[test]
fn test_new_non_configurable_property() {
    let realm = Realm::new();
    let wet = realm.object();
    let dry = obj(&create_membrane(wet.to_value()).unwrap().membrane);

    assert!(dry
        .define_own_property("x", PropertyDescriptor::data(1, true, true, false))
        .unwrap());
    assert_eq!(dry.get("x").unwrap(), Value::from(1));
    assert_eq!(wet.get("x").unwrap(), Value::from(1));
    assert!(!wet.get_own_property("x").unwrap().unwrap().is_configurable());
}

#[test]
fn test_round_trip_unwraps_instead_of_double_wrapping() {
    let realm = Realm::new();
    let wet = realm.object();
    wet.set("out", realm.object()).unwrap();
    wet.set(
        "id",
        realm.function(|_, args| Ok(args.first().cloned().unwrap_or_default())),
    )
    .unwrap();

    let dry_a = obj(&create_membrane(wet.to_value()).unwrap().membrane);
    let dry_b = dry_a.get("out").unwrap();
    let dry_c = Realm::new().object().to_value();

    assert_eq!(dry_a.invoke("id", &[dry_b.clone()]).unwrap(), dry_b);
    assert_eq!(dry_a.invoke("id", &[dry_a.to_value()]).unwrap(), dry_a.to_value());
    assert_eq!(dry_a.invoke("id", &[dry_c.clone()]).unwrap(), dry_c);
}

#[test]
fn test_arguments_are_wrapped_into_wet_and_unwrapped_on_return() {
    let realm = Realm::new();
    let wet = realm.object();
    wet.set("baz", realm.object()).unwrap();
    let spy: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
    let recorded = spy.clone();
    wet.set(
        "functionThatModifies",
        realm.function(move |this, args| {
            let baz = args.first().cloned().unwrap_or_default();
            obj(this).set("baz", baz.clone())?;
            *recorded.lock().unwrap() = Some(baz);
            Ok(Value::Undefined)
        }),
    )
    .unwrap();

    let dry = obj(&create_membrane(wet.to_value()).unwrap().membrane);
    let original_baz = Realm::new().object();
    original_baz.set("a", 1).unwrap();
    dry.invoke("functionThatModifies", &[original_baz.to_value()])
        .unwrap();

    let seen = spy.lock().unwrap().clone().unwrap();
    assert_ne!(seen, original_baz.to_value());
    assert_eq!(seen, wet.get("baz").unwrap());
    assert_eq!(get(&seen, "a"), Value::from(1));
    assert_eq!(dry.get("baz").unwrap(), original_baz.to_value());
    assert_ne!(wet.get("baz").unwrap(), original_baz.to_value());
}

#[test]
fn test_date_get_time_through_membrane() {
    let realm = Realm::new();
    let wet_date = realm.date(1_700_000_000_000.0);
    let dry_date = obj(&create_membrane(wet_date.to_value()).unwrap().membrane);

    let time = dry_date.invoke("getTime", &[]).unwrap();
    assert_eq!(time.type_of(), "number");
    assert_eq!(time, Value::from(1_700_000_000_000.0));
}

#[test]
fn test_has_and_delete() {
    let realm = Realm::new();
    let wet = realm.object();
    wet.set("x", 0).unwrap();
    let dry = obj(&create_membrane(wet.to_value()).unwrap().membrane);

    assert!(dry.has("x").unwrap());
    assert!(dry.has_own("x").unwrap());
    assert!(dry.delete("x").unwrap());
    assert!(!dry.has("x").unwrap());
    assert!(!dry.has_own("x").unwrap());
    assert!(!wet.has_own("x").unwrap());
}

#[test]
fn test_object_keys_through_membrane() {
    let realm = Realm::new();
    let wet = realm.object();
    wet.set("x", 0).unwrap();
    wet.set("y", 0).unwrap();
    let dry = obj(&create_membrane(wet.to_value()).unwrap().membrane);
    assert_eq!(object_keys(&dry).unwrap().len(), 2);
}

#[test]
fn test_repeated_reads_return_same_wrapper() {
    let realm = Realm::new();
    let wet = realm.object();
    wet.set("x", realm.object()).unwrap();
    let collection = realm.array_from((1..=3).map(|x| {
        let item = realm.object();
        item.set("x", x).unwrap();
        item.to_value()
    }));
    wet.set("collection", collection.clone()).unwrap();

    let dry = create_membrane(wet.to_value()).unwrap().membrane;
    assert_eq!(get(&dry, "x"), get(&dry, "x"));

    let dry_collection = get(&dry, "collection");
    assert_ne!(dry_collection, collection.to_value());
    assert_eq!(dry_collection, get(&dry, "collection"));
    assert_eq!(
        obj(&dry_collection).get(0usize).unwrap(),
        obj(&dry_collection).get(0usize).unwrap()
    );
}

#[test]
fn test_splice_through_wrapper() {
    init_tracing();
    let realm = Realm::new();
    let wet = realm.object();
    wet.set(
        "strings",
        realm.array_from(["alpha", "beta", "gamma"].into_iter().map(Value::from)),
    )
    .unwrap();

    let dry = create_membrane(wet.to_value()).unwrap().membrane;
    let dry_strings = get(&dry, "strings");
    assert_eq!(get(&dry_strings, "length"), Value::from(3));

    let removed = obj(&dry_strings)
        .invoke(
            "splice",
            &[
                Value::from(1),
                Value::from(1),
                Value::from("delta"),
                Value::from("epsilon"),
            ],
        )
        .unwrap();

    let wet_strings = obj(&wet.get("strings").unwrap());
    assert_eq!(
        strings(&array_to_vec(&wet_strings).unwrap()),
        vec!["alpha", "delta", "epsilon", "gamma"]
    );
    assert_eq!(strings(&array_to_vec(&obj(&removed)).unwrap()), vec!["beta"]);
}

#[test]
fn test_foreign_splice_applied_to_wrapper() {
    let wet_realm = Realm::new();
    let dry_realm = Realm::new();
    let wet = wet_realm.object();
    wet.set(
        "strings",
        wet_realm.array_from(["alpha", "beta", "gamma"].into_iter().map(Value::from)),
    )
    .unwrap();

    let dry = create_membrane(wet.to_value()).unwrap().membrane;
    let dry_strings = get(&dry, "strings");

    // The dry realm's own splice works purely through the wrapper's traps.
    let splice = obj(&dry_realm.array_prototype().get("splice").unwrap());
    splice
        .call(
            &dry_strings,
            &[
                Value::from(1),
                Value::from(1),
                Value::from("delta"),
                Value::from("epsilon"),
            ],
        )
        .unwrap();

    let wet_strings = obj(&wet.get("strings").unwrap());
    assert_eq!(
        strings(&array_to_vec(&wet_strings).unwrap()),
        vec!["alpha", "delta", "epsilon", "gamma"]
    );
    assert_eq!(wet_strings.get("length").unwrap(), Value::from(4));
}

#[test]
fn test_thrown_values_cross_the_boundary() {
    let realm = Realm::new();
    let payload = realm.error("wet failure");
    let wet = {
        let payload = payload.clone();
        realm.function(move |_, _| Err(Error::thrown(payload.clone())))
    };

    let dry = obj(&create_membrane(wet.to_value()).unwrap().membrane);
    let err = dry.call(&Value::Undefined, &[]).unwrap_err();
    let thrown = err.thrown_value().cloned().unwrap();

    assert_ne!(thrown, payload.to_value());
    assert_eq!(get(&thrown, "message"), Value::from("wet failure"));
    assert_eq!(obj(&thrown).class(), payload.class());
}

#[test]
fn test_constructors_are_wrapped() {
    let realm = Realm::new();
    let point = realm.constructor(|this, args| {
        obj(this).set("x", args.first().cloned().unwrap_or_default())?;
        Ok(Value::Undefined)
    });
    let prototype = obj(&point.get("prototype").unwrap());
    prototype.set("kind", "point").unwrap();

    let dry_point = obj(&create_membrane(point.to_value()).unwrap().membrane);
    assert!(dry_point.is_constructor());

    let instance = dry_point.construct(&[Value::from(3)]).unwrap();
    assert_eq!(get(&instance, "x"), Value::from(3));
    assert_eq!(get(&instance, "kind"), Value::from("point"));
    assert_eq!(
        obj(&instance).prototype().unwrap(),
        dry_point.get("prototype").unwrap().into_object()
    );
}

#[test]
fn test_pair_scope_revokes_only_its_pair() {
    let realm = Realm::new();
    let config = MembraneConfig {
        revocation_scope: RevocationScope::Pair,
        ..MembraneConfig::default()
    };
    let wet = realm.object();
    wet.set("x", 1).unwrap();

    let created = create_membrane_with_config(wet.to_value(), config).unwrap();
    let membrane = &created.handle;
    let damp = GraphName::from("damp");
    let damp_view = obj(&membrane
        .convert_argument_to_proxy(membrane.wet_graph(), &damp, wet.to_value())
        .unwrap());

    assert!(created.revoke.revoke());
    assert!(obj(&created.membrane).get("x").unwrap_err().is_revoked());
    assert_eq!(damp_view.get("x").unwrap(), Value::from(1));
    assert!(!membrane.is_revoked(membrane.dry_graph()));

    assert!(membrane.revoke_graph(membrane.wet_graph()));
    assert!(damp_view.get("x").unwrap_err().is_revoked());
}

#[test]
fn test_trap_tracing_can_be_enabled() {
    init_tracing();
    let config = MembraneConfig::from_toml_str("trace_traps = true\nlog_level = \"trace\"\n").unwrap();
    let realm = Realm::new();
    let wet = realm.object();
    wet.set("x", 1).unwrap();

    let created = create_membrane_with_config(wet.to_value(), config).unwrap();
    assert!(created.handle.config().trace_traps);
    assert_eq!(get(&created.membrane, "x"), Value::from(1));
}

#[test]
fn test_wrappers_are_released_when_unreferenced() {
    let realm = Realm::new();
    let wet = realm.object();
    let created = create_membrane(wet.to_value()).unwrap();
    for _ in 0..8 {
        wet.set("child", realm.object()).unwrap();
        let _ = get(&created.membrane, "child");
    }

    // Each dropped child wrapper leaves one forward and one inverse entry.
    assert!(created.handle.prune() >= 16);
    let root = created
        .handle
        .get_membrane_proxy(created.handle.dry_graph(), &wet.to_value());
    assert_eq!(root, Some(created.membrane.clone()));
}

#[test]
fn test_every_trap_fails_after_revocation() {
    let realm = Realm::new();
    let wet = realm.object();
    wet.set("x", 1).unwrap();
    wet.set("Point", realm.constructor(|_, _| Ok(Value::Undefined)))
        .unwrap();

    let created = create_membrane(wet.to_value()).unwrap();
    let dry = obj(&created.membrane);
    let dry_point = obj(&dry.get("Point").unwrap());
    created.revoke.revoke();

    assert!(revoked(dry.has("x")));
    assert!(revoked(dry.delete("x")));
    assert!(revoked(dry.define_own_property("y", PropertyDescriptor::plain(2))));
    assert!(revoked(dry.get_own_property("x")));
    assert!(revoked(dry.prevent_extensions()));
    assert!(revoked(dry.set_prototype(None)));
    assert!(revoked(dry_point.construct(&[])));
    assert!(revoked(dry_point.call(&Value::Undefined, &[])));

    // The target saw none of it.
    assert_eq!(wet.get("x").unwrap(), Value::from(1));
    assert!(!wet.has_own("y").unwrap());
    assert!(wet.is_extensible().unwrap());
    assert_eq!(wet.prototype().unwrap().as_ref(), Some(realm.object_prototype()));
}

#[test]
fn test_set_prototype_unwraps_and_wraps() {
    let realm = Realm::new();
    let wet = realm.object();
    let child = realm.object();
    let proto = realm.object();
    proto.set("greeting", "hello").unwrap();
    wet.set("child", child.clone()).unwrap();
    wet.set("proto", proto.clone()).unwrap();

    let created = create_membrane(wet.to_value()).unwrap();
    let membrane = &created.handle;
    let dry_child = obj(&get(&created.membrane, "child"));
    let dry_proto = obj(&get(&created.membrane, "proto"));

    // A dry view of a wet prototype lands on the wet side unwrapped.
    assert!(dry_child.set_prototype(Some(dry_proto.clone())).unwrap());
    assert_eq!(child.prototype().unwrap(), Some(proto.clone()));
    assert_eq!(dry_child.prototype().unwrap(), Some(dry_proto));
    assert_eq!(dry_child.get("greeting").unwrap(), Value::from("hello"));

    // A dry-native prototype is wrapped for the wet side.
    let dry_realm = Realm::new();
    let dry_native = dry_realm.object();
    dry_native.set("flavor", "dry").unwrap();
    assert!(dry_child.set_prototype(Some(dry_native.clone())).unwrap());

    let wet_view = child.prototype().unwrap().unwrap();
    assert_ne!(wet_view, dry_native);
    assert!(membrane.is_wrapper(&wet_view.to_value()));
    assert_eq!(
        membrane.get_membrane_value(membrane.wet_graph(), &wet_view.to_value()),
        Some(dry_native.to_value())
    );
    assert_eq!(child.get("flavor").unwrap(), Value::from("dry"));
    assert_eq!(dry_child.prototype().unwrap(), Some(dry_native));

    assert!(dry_child.set_prototype(None).unwrap());
    assert!(child.prototype().unwrap().is_none());
}

#[test]
fn test_prototype_cycles_through_wrappers_are_rejected() {
    let realm = Realm::new();
    let dry_realm = Realm::new();

    // Closing the loop from the wrapper side.
    let wet = realm.object();
    let dry_view = obj(&create_membrane(wet.to_value()).unwrap().membrane);
    let dry_native = dry_realm.object();
    assert!(dry_native.set_prototype(Some(dry_view.clone())).unwrap());
    assert!(!dry_view.set_prototype(Some(dry_native.clone())).unwrap());
    assert_eq!(wet.prototype().unwrap().as_ref(), Some(realm.object_prototype()));
    assert!(dry_native.get("missing").unwrap().is_undefined());

    // Closing the loop from the ordinary side.
    let wet = realm.object();
    let dry_view = obj(&create_membrane(wet.to_value()).unwrap().membrane);
    let dry_native = dry_realm.object();
    assert!(dry_view.set_prototype(Some(dry_native.clone())).unwrap());
    assert!(!dry_native.set_prototype(Some(dry_view.clone())).unwrap());
    assert_eq!(dry_native.prototype().unwrap().as_ref(), Some(dry_realm.object_prototype()));
    assert!(dry_view.get("missing").unwrap().is_undefined());
}

#[test]
fn test_thrown_values_from_every_trap_cross_the_boundary() {
    let realm = Realm::new();
    let payload = realm.error("refused").to_value();
    let target = ObjectRef::new(ThrowingObject {
        id: ObjectId::next(),
        payload: payload.clone(),
    });
    let created = create_membrane(target.to_value()).unwrap();
    let membrane = &created.handle;
    let dry = obj(&created.membrane);

    let failures = [
        dry.prototype().err(),
        dry.set_prototype(None).err(),
        dry.is_extensible().err(),
        dry.prevent_extensions().err(),
        dry.get_own_property("x").err(),
        dry.define_own_property("x", PropertyDescriptor::plain(1)).err(),
        dry.has("x").err(),
        dry.get("x").err(),
        dry.delete("x").err(),
        dry.own_keys().err(),
    ];
    for failure in failures {
        let thrown = failure.and_then(|err| err.thrown_value().cloned()).unwrap();
        assert_ne!(thrown, payload);
        assert_eq!(
            membrane.get_membrane_value(membrane.dry_graph(), &thrown),
            Some(payload.clone())
        );
    }
}

#[test]
fn test_log_level_filters_membrane_events() {
    let realm = Realm::new();
    let wet = realm.object();
    wet.set("child", realm.object()).unwrap();
    let events = [
        "Created membrane",
        "Created wrapper",
        "Trap invoked",
        "Revoked membrane access",
        "Pruned identity map",
    ];
    let exercise = |config: MembraneConfig| {
        capture_logs(|| {
            let created = create_membrane_with_config(wet.to_value(), config).unwrap();
            let _ = get(&created.membrane, "child");
            created.revoke.revoke();
            created.handle.prune();
        })
        .1
    };

    let quiet = exercise(MembraneConfig {
        trace_traps: true,
        ..MembraneConfig::default()
    });
    for event in events {
        assert!(!quiet.contains(event), "{} logged at info level", event);
    }

    let verbose = exercise(MembraneConfig {
        trace_traps: true,
        log_level: LogLevel::Trace,
        ..MembraneConfig::default()
    });
    for event in events {
        assert!(verbose.contains(event), "{} missing at trace level", event);
    }
}
