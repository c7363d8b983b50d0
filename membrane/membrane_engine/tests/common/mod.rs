//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use membrane_core::error::{Error, Result};
use membrane_core::{ObjectRef, PropertyDescriptor, Realm, Value};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

// Initialize tracing for tests
pub fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// A log sink shared between a subscriber and the test reading it.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

/// Run `f` with every tracing event on this thread written to a buffer.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, logs.contents())
}

/// The object behind a value, panicking for primitives.
pub fn obj(value: &Value) -> ObjectRef {
    value
        .as_object()
        .cloned()
        .unwrap_or_else(|| panic!("expected an object, got {:?}", value))
}

/// Read `key` off an object value.
pub fn get(value: &Value, key: &str) -> Value {
    obj(value).get(key).unwrap()
}

fn this_object(this: &Value) -> Result<ObjectRef> {
    this.as_object()
        .cloned()
        .ok_or_else(|| Error::type_error("receiver is not an object"))
}

/// A small DOM-like document graph.
pub struct MockDocument {
    pub realm: Realm,
    pub document: ObjectRef,
    pub node_prototype: ObjectRef,
}

impl MockDocument {
    /// Build a document with a detached root element.
    pub fn new() -> Self {
        let realm = Realm::new();
        let node_prototype = realm.object();

        // firstChild: the first entry of this.childNodes, or null
        let first_child = realm.function(|this, _| {
            let this = this_object(this)?;
            let children = this.get("childNodes")?;
            match children.as_object() {
                Some(children) => {
                    let first = children.get(0usize)?;
                    Ok(if first.is_undefined() { Value::Null } else { first })
                }
                None => Ok(Value::Null),
            }
        });
        node_prototype
            .define_own_property(
                "firstChild",
                PropertyDescriptor::accessor(first_child.to_value(), Value::Undefined, false, true),
            )
            .unwrap();

        // insertBefore(newChild, refChild): appends when refChild is null
        let insert_before = realm.function(|this, args| {
            let this = this_object(this)?;
            let child = args.first().cloned().unwrap_or_default();
            let child_object = child
                .as_object()
                .cloned()
                .ok_or_else(|| Error::type_error("child is not a node"))?;
            let children = this_object(&this.get("childNodes")?)?;
            children.invoke("push", &[child.clone()])?;
            child_object.set("parentNode", this.clone())?;
            Ok(child)
        });
        node_prototype
            .define_own_property(
                "insertBefore",
                PropertyDescriptor::data(insert_before, true, false, true),
            )
            .unwrap();

        let document = realm.object_with_proto(Some(node_prototype.clone()));
        document.set("nodeType", 9).unwrap();
        document.set("nodeName", "#document").unwrap();
        document.set("childNodes", realm.array()).unwrap();
        document.set("ownerDocument", Value::Null).unwrap();
        document.set("parentNode", Value::Null).unwrap();

        let base_url_getter = realm.function(|this, _| this_object(this)?.get("_baseURL"));
        let base_url_setter = realm.function(|this, args| {
            this_object(this)?.set("_baseURL", args.first().cloned().unwrap_or_default())?;
            Ok(Value::Undefined)
        });
        document
            .define_own_property(
                "baseURL",
                PropertyDescriptor::accessor(
                    base_url_getter.to_value(),
                    base_url_setter.to_value(),
                    true,
                    true,
                ),
            )
            .unwrap();
        document.set("_baseURL", "about:blank").unwrap();

        let root = realm.object_with_proto(Some(node_prototype.clone()));
        root.set("nodeType", 1).unwrap();
        root.set("nodeName", "HTML").unwrap();
        root.set("childNodes", realm.array()).unwrap();
        root.set("ownerDocument", document.clone()).unwrap();
        root.set("parentNode", Value::Null).unwrap();
        document.set("rootElement", root).unwrap();

        Self {
            realm,
            document,
            node_prototype,
        }
    }
}
