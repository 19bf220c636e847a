//! Shared helpers for clone tests

#![allow(dead_code)]

use clone_obj::{JsFunction, JsObject, PropertyDescriptor, Value};
use std::sync::Arc;

/// Deep structural comparison that tolerates cycles
///
/// Objects match when they have the same class, the same own keys in the
/// same order, and matching descriptors. Accessor functions must be the
/// same functions. Opaque objects compare by primitive value and bytes.
pub fn structurally_eq(a: &Value, b: &Value) -> bool {
    eq(a, b, &mut Vec::new())
}

fn eq(a: &Value, b: &Value, seen: &mut Vec<(usize, usize)>) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y || (x.is_nan() && y.is_nan()),
        (Value::Array(x), Value::Array(y)) => {
            let pair = (Arc::as_ptr(x) as usize, Arc::as_ptr(y) as usize);
            if seen.contains(&pair) {
                return true;
            }
            seen.push(pair);
            let (xs, ys) = (x.to_vec(), y.to_vec());
            xs.len() == ys.len() && xs.iter().zip(&ys).all(|(p, q)| eq(p, q, seen))
        }
        (Value::Object(x), Value::Object(y)) => {
            let pair = (Arc::as_ptr(x) as usize, Arc::as_ptr(y) as usize);
            if seen.contains(&pair) {
                return true;
            }
            seen.push(pair);
            objects_eq(x, y, seen)
        }
        _ => a == b,
    }
}

fn objects_eq(x: &Arc<JsObject>, y: &Arc<JsObject>, seen: &mut Vec<(usize, usize)>) -> bool {
    if x.class_name() != y.class_name() {
        return false;
    }
    if !x.is_ordinary() {
        let same_primitive = match (x.value_of(), y.value_of()) {
            (Some(p), Some(q)) => eq(&p, &q, seen),
            (None, None) => true,
            _ => false,
        };
        return same_primitive && x.buffer_bytes() == y.buffer_bytes();
    }

    let keys = x.own_keys();
    if keys != y.own_keys() {
        return false;
    }
    keys.iter().all(|key| {
        match (x.get_own_property(key), y.get_own_property(key)) {
            (
                Some(PropertyDescriptor::Data { value: p, attributes: pa }),
                Some(PropertyDescriptor::Data { value: q, attributes: qa }),
            ) => pa == qa && eq(&p, &q, seen),
            (
                Some(PropertyDescriptor::Accessor { get: pg, set: ps, attributes: pa }),
                Some(PropertyDescriptor::Accessor { get: qg, set: qs, attributes: qa }),
            ) => pa == qa && same_fn(&pg, &qg) && same_fn(&ps, &qs),
            _ => false,
        }
    })
}

fn same_fn(a: &Option<Arc<JsFunction>>, b: &Option<Arc<JsFunction>>) -> bool {
    match (a, b) {
        (Some(f), Some(g)) => Arc::ptr_eq(f, g),
        (None, None) => true,
        _ => false,
    }
}

/// Plain object from `(key, value)` pairs
pub fn object(entries: Vec<(&str, Value)>) -> Arc<JsObject> {
    let obj = Arc::new(JsObject::new());
    for (key, value) in entries {
        obj.set(key.into(), value).expect("plain assignment");
    }
    obj
}

/// Read a string-keyed property
pub fn get(value: &Value, key: &str) -> Value {
    value
        .as_object()
        .expect("object")
        .get(&key.into())
        .expect("getter")
}
