//! Field access by name.
//!
//! Instance fields are reached through a value's serde representation: the
//! fields of `target` are the keys of its serialized object, which includes
//! private fields and `#[serde(flatten)]`ed parent structs. Writes go
//! through [`Reflect`], which lets a type seal fields against overwrites.
//!
//! Static fields have no serde form, so they live in a process-wide
//! registry of named slots keyed by owner type. Registered slots can always
//! be written, whatever the original value's mutability.

use commons_types::{CommonsError, Reflect, Result};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::any::type_name;
use std::collections::HashMap;

static STATICS: Lazy<RwLock<HashMap<String, Value>>> = Lazy::new(|| RwLock::new(HashMap::new()));

fn describe<O: ?Sized>(action: &str, name: &str) -> String {
    format!("{} field {}.{}", action, type_name::<O>(), name)
}

fn fail(msg: String, cause: impl std::fmt::Display) -> CommonsError {
    tracing::error!("{}", msg);
    CommonsError::runtime(msg, cause)
}

fn fields_of<S: Serialize + ?Sized>(target: &S, msg: &str) -> Result<Map<String, Value>> {
    match serde_json::to_value(target) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(fail(msg.to_string(), "target has no named fields")),
        Err(e) => Err(fail(msg.to_string(), e)),
    }
}

/// Read field `name` of `target`.
pub fn read_field<T, S>(target: &S, name: &str) -> Result<T>
where
    T: DeserializeOwned,
    S: Serialize + ?Sized,
{
    let msg = describe::<S>("Read", name);
    let mut fields = fields_of(target, &msg)?;
    let value = fields
        .remove(name)
        .ok_or_else(|| fail(msg.clone(), "no such field"))?;
    serde_json::from_value(value).map_err(|e| fail(msg, e))
}

/// Write `value` into field `name` of `target`.
///
/// Sealed fields, fields already holding an equal value, and unknown
/// fields are left alone. Returns whether the field changed. A target that
/// does not survive its own serde round trip is an error and is left
/// untouched.
pub fn write_field<S, V>(target: &mut S, name: &str, value: V) -> Result<bool>
where
    S: Reflect,
    V: Serialize,
{
    let msg = describe::<S>("Write", name);
    if S::sealed_fields().iter().any(|sealed| *sealed == name) {
        tracing::debug!("{} skipped: field is sealed", msg);
        return Ok(false);
    }

    let mut fields = fields_of(&*target, &msg)?;
    let value = serde_json::to_value(value).map_err(|e| fail(msg.clone(), e))?;
    match fields.get(name) {
        None => return Ok(false),
        Some(current) if *current == value => return Ok(false),
        Some(_) => {}
    }

    let rebuilt: S =
        serde_json::from_value(Value::Object(fields.clone())).map_err(|e| fail(msg.clone(), e))?;
    if rebuilt != *target {
        return Err(fail(msg, "value has state outside its serialized form"));
    }

    fields.insert(name.to_string(), value);
    *target = serde_json::from_value(Value::Object(fields)).map_err(|e| fail(msg.clone(), e))?;
    tracing::debug!("{}", msg);
    Ok(true)
}

/// Register static field `name` of owner type `O`.
///
/// Registering again replaces the slot.
pub fn register_static<O: ?Sized, V: Serialize>(name: &str, value: V) -> Result<()> {
    let msg = describe::<O>("Register", name);
    let value = serde_json::to_value(value).map_err(|e| fail(msg.clone(), e))?;
    STATICS.write().insert(format!("{}.{}", type_name::<O>(), name), value);
    Ok(())
}

/// Read static field `name` of owner type `O`.
pub fn read_static<O: ?Sized, T: DeserializeOwned>(name: &str) -> Result<T> {
    let msg = describe::<O>("Read", name);
    let value = STATICS
        .read()
        .get(&format!("{}.{}", type_name::<O>(), name))
        .cloned()
        .ok_or_else(|| fail(msg.clone(), "no such field"))?;
    serde_json::from_value(value).map_err(|e| fail(msg, e))
}

/// Overwrite static field `name` of owner type `O`.
///
/// Unregistered fields are left alone. Returns whether a slot was written.
pub fn write_static<O: ?Sized, V: Serialize>(name: &str, value: V) -> Result<bool> {
    let msg = describe::<O>("Write", name);
    let value = serde_json::to_value(value).map_err(|e| fail(msg.clone(), e))?;
    let mut statics = STATICS.write();
    match statics.get_mut(&format!("{}.{}", type_name::<O>(), name)) {
        Some(slot) => {
            *slot = value;
            tracing::debug!("{}", msg);
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Remove static field `name` of owner type `O` from the registry.
pub fn unregister_static<O: ?Sized>(name: &str) -> bool {
    STATICS
        .write()
        .remove(&format!("{}.{}", type_name::<O>(), name))
        .is_some()
}
