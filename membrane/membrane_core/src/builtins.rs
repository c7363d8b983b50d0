//! Generic built-in algorithms.
//!
//! Everything here works purely through [`ObjectRef`] operations, so the
//! same code runs against ordinary objects and membrane wrappers alike.

use crate::error::{Error, Result};
use crate::object::ObjectRef;
use crate::types::{PropertyDescriptor, PropertyKey, Value};

/// Clamp a value to a valid array length.
pub fn to_length(value: &Value) -> Result<u64> {
    let n = value.to_integer_or_infinity()?;
    if n <= 0.0 {
        Ok(0)
    } else {
        Ok(n.min(9_007_199_254_740_991.0) as u64)
    }
}

/// Read `length` off an array-like object.
pub fn length_of(object: &ObjectRef) -> Result<u64> {
    to_length(&object.get("length")?)
}

fn set_or_throw(object: &ObjectRef, key: impl Into<PropertyKey>, value: Value) -> Result<()> {
    let key = key.into();
    if object.set(&key, value)? {
        Ok(())
    } else {
        Err(Error::type_error(format!(
            "Cannot assign to read only property '{}'",
            key
        )))
    }
}

fn delete_or_throw(object: &ObjectRef, key: impl Into<PropertyKey>) -> Result<()> {
    let key = key.into();
    if object.delete(&key)? {
        Ok(())
    } else {
        Err(Error::type_error(format!("Cannot delete property '{}'", key)))
    }
}

fn index_key(index: u64) -> PropertyKey {
    PropertyKey::from(index.to_string())
}

fn relative_index(value: &Value, length: u64) -> Result<u64> {
    let relative = value.to_integer_or_infinity()?;
    let length = length as f64;
    let index = if relative < 0.0 {
        (length + relative).max(0.0)
    } else {
        relative.min(length)
    };
    Ok(index as u64)
}

/// Remove `delete_count` elements at `start` and insert `items` in their
/// place, returning the removed elements as a new array built by
/// `make_array`.
///
/// `start` and `delete_count` follow the usual argument conventions:
/// negative starts count from the end, a missing count removes the tail.
pub fn splice<F>(
    object: &ObjectRef,
    start: Option<&Value>,
    delete_count: Option<&Value>,
    items: &[Value],
    make_array: F,
) -> Result<ObjectRef>
where
    F: FnOnce() -> ObjectRef,
{
    let length = length_of(object)?;
    let actual_start = relative_index(start.unwrap_or(&Value::Undefined), length)?;
    let actual_delete = match (start, delete_count) {
        (None, _) => 0,
        (Some(_), None) => length - actual_start,
        (Some(_), Some(count)) => {
            let count = count.to_integer_or_infinity()?.max(0.0);
            (count.min((length - actual_start) as f64)) as u64
        }
    };
    let item_count = items.len() as u64;

    let removed = make_array();
    for k in 0..actual_delete {
        let from = index_key(actual_start + k);
        if object.has(&from)? {
            let value = object.get(&from)?;
            removed.define_own_property(index_key(k), PropertyDescriptor::plain(value))?;
        }
    }
    set_or_throw(&removed, "length", Value::from(actual_delete as f64))?;

    if item_count < actual_delete {
        for k in actual_start..(length - actual_delete) {
            let from = index_key(k + actual_delete);
            let to = index_key(k + item_count);
            if object.has(&from)? {
                let value = object.get(&from)?;
                set_or_throw(object, to, value)?;
            } else {
                delete_or_throw(object, to)?;
            }
        }
        let new_length = length - actual_delete + item_count;
        for k in (new_length..length).rev() {
            delete_or_throw(object, index_key(k))?;
        }
    } else if item_count > actual_delete {
        for k in (actual_start..(length - actual_delete)).rev() {
            let from = index_key(k + actual_delete);
            let to = index_key(k + item_count);
            if object.has(&from)? {
                let value = object.get(&from)?;
                set_or_throw(object, to, value)?;
            } else {
                delete_or_throw(object, to)?;
            }
        }
    }

    for (offset, item) in items.iter().enumerate() {
        set_or_throw(object, index_key(actual_start + offset as u64), item.clone())?;
    }
    set_or_throw(
        object,
        "length",
        Value::from((length - actual_delete + item_count) as f64),
    )?;
    Ok(removed)
}

/// Append `items` and return the new length.
pub fn push(object: &ObjectRef, items: &[Value]) -> Result<u64> {
    let length = length_of(object)?;
    for (offset, item) in items.iter().enumerate() {
        set_or_throw(object, index_key(length + offset as u64), item.clone())?;
    }
    let new_length = length + items.len() as u64;
    set_or_throw(object, "length", Value::from(new_length as f64))?;
    Ok(new_length)
}

/// Own enumerable string keys, in property order.
pub fn object_keys(object: &ObjectRef) -> Result<Vec<PropertyKey>> {
    let mut keys = Vec::new();
    for key in object.own_keys()? {
        if key.is_symbol() {
            continue;
        }
        if let Some(desc) = object.get_own_property(&key)? {
            if desc.is_enumerable() {
                keys.push(key);
            }
        }
    }
    Ok(keys)
}

/// Read every element of an array-like object.
pub fn array_to_vec(object: &ObjectRef) -> Result<Vec<Value>> {
    let length = length_of(object)?;
    (0..length).map(|index| object.get(index_key(index))).collect()
}
