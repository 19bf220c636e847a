//! Plain-object classification

use crate::object::JsObject;
use crate::value::Value;

/// Plain/opaque decision for an object the cloner is about to copy
pub fn is_plain(obj: &JsObject) -> bool {
    obj.is_ordinary()
}

/// True only for objects built through the ordinary object path
///
/// Arrays, functions, dates, boxed primitives, buffers and host class
/// instances are not plain.
pub fn is_plain_object(value: &Value) -> bool {
    value.as_object().is_some_and(|obj| is_plain(obj))
}
