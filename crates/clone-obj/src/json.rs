//! JSON interop
//!
//! Builds value graphs from `serde_json` documents and serializes them back
//! with `JSON.stringify` conventions: only enumerable string keys, getters
//! are read, functions/symbols/undefined are dropped from objects and become
//! `null` inside arrays.

use serde_json::{Map, Number, Value as Json};
use std::sync::Arc;

use crate::error::{CloneError, CloneResult};
use crate::object::{JsObject, ObjectClass, PropertyDescriptor, PropertyKey};
use crate::value::Value;

/// Largest integer a double represents exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl Value {
    /// Build a value graph from a JSON document
    ///
    /// Objects become plain objects with default attributes; every container
    /// is a fresh allocation.
    pub fn from_json(json: &Json) -> Value {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Boolean(*b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::string(s),
            Json::Array(items) => Value::array(items.iter().map(Value::from_json).collect()),
            Json::Object(map) => {
                let obj = JsObject::new();
                for (key, item) in map {
                    obj.define_property(
                        PropertyKey::string(key),
                        PropertyDescriptor::data(Value::from_json(item)),
                    );
                }
                Value::Object(Arc::new(obj))
            }
        }
    }

    /// Serialize to a JSON document
    ///
    /// A value that serializes to nothing (undefined, a function, a symbol)
    /// yields `null`. Cyclic graphs fail with a `TypeError`.
    pub fn to_json(&self) -> CloneResult<Json> {
        let mut stack = Vec::new();
        Ok(serialize(self, &mut stack)?.unwrap_or(Json::Null))
    }
}

fn number_to_json(n: f64) -> Json {
    if !n.is_finite() {
        return Json::Null;
    }
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Json::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(Json::Null, Json::Number)
}

fn date_to_json(time_value: f64) -> Json {
    if !time_value.is_finite() {
        return Json::Null;
    }
    chrono::DateTime::from_timestamp_millis(time_value as i64).map_or(Json::Null, |dt| {
        Json::String(dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
    })
}

fn serialize(value: &Value, stack: &mut Vec<usize>) -> CloneResult<Option<Json>> {
    match value {
        Value::Undefined | Value::Symbol(_) | Value::Function(_) => Ok(None),
        Value::Null => Ok(Some(Json::Null)),
        Value::Boolean(b) => Ok(Some(Json::Bool(*b))),
        Value::Number(n) => Ok(Some(number_to_json(*n))),
        Value::String(s) => Ok(Some(Json::String(s.to_string()))),
        Value::Array(arr) => {
            let addr = Arc::as_ptr(arr) as usize;
            enter(stack, addr)?;
            let mut items = Vec::with_capacity(arr.len());
            for element in arr.to_vec() {
                items.push(serialize(&element, stack)?.unwrap_or(Json::Null));
            }
            stack.pop();
            Ok(Some(Json::Array(items)))
        }
        Value::Object(obj) => serialize_object(obj, stack),
    }
}

fn serialize_object(obj: &Arc<JsObject>, stack: &mut Vec<usize>) -> CloneResult<Option<Json>> {
    match obj.class() {
        ObjectClass::Date(t) => return Ok(Some(date_to_json(*t))),
        ObjectClass::Boolean(b) => return Ok(Some(Json::Bool(*b))),
        ObjectClass::Number(n) => return Ok(Some(number_to_json(*n))),
        ObjectClass::String(s) => return Ok(Some(Json::String(s.to_string()))),
        ObjectClass::Buffer(bytes) => {
            let data = bytes.read().iter().map(|b| Json::from(*b)).collect();
            let mut map = Map::new();
            map.insert("type".to_string(), Json::String("Buffer".to_string()));
            map.insert("data".to_string(), Json::Array(data));
            return Ok(Some(Json::Object(map)));
        }
        ObjectClass::Host(host) => {
            if let Some(primitive) = host.value_of() {
                return serialize(&primitive, stack);
            }
        }
        ObjectClass::Ordinary => {}
    }

    let addr = Arc::as_ptr(obj) as usize;
    enter(stack, addr)?;
    let mut map = Map::new();
    for key in obj.keys() {
        let Some(name) = key.as_str() else {
            continue;
        };
        let item = obj.get(&key)?;
        if let Some(json) = serialize(&item, stack)? {
            map.insert(name.to_string(), json);
        }
    }
    stack.pop();
    Ok(Some(Json::Object(map)))
}

fn enter(stack: &mut Vec<usize>, addr: usize) -> CloneResult<()> {
    if stack.contains(&addr) {
        return Err(CloneError::type_error(
            "Converting circular structure to JSON",
        ));
    }
    stack.push(addr);
    Ok(())
}
