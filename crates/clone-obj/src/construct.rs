//! Copy construction for opaque objects
//!
//! The cloner cannot see inside dates, boxed primitives, buffers or host
//! class instances, so it asks the object's own class to build a copy from
//! the original, the way `new original.constructor(original)` would.

use std::any::Any;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{CloneError, CloneResult};
use crate::object::{JsObject, ObjectClass};
use crate::value::Value;

/// An instance of a host-defined class
///
/// Implement this for custom types stored inside `JsObject::host`. The
/// cloner calls `construct_from` on the original to get the copy.
pub trait HostObject: Any + Send + Sync + std::fmt::Debug {
    /// Constructor name
    fn class_name(&self) -> &str;

    /// Build a new instance from `self`, the single constructor argument
    ///
    /// Classes without a copy constructor keep the default, which fails.
    fn construct_from(&self) -> CloneResult<Box<dyn HostObject>> {
        Err(CloneError::NotConstructible(self.class_name().to_string()))
    }

    /// Primitive value, if the class has one
    fn value_of(&self) -> Option<Value> {
        None
    }

    /// Upcast for downcasting to the concrete type
    fn as_any(&self) -> &dyn Any;
}

impl ObjectClass {
    /// Internal state for a fresh instance constructed from this one
    fn construct_from(&self) -> CloneResult<ObjectClass> {
        Ok(match self {
            Self::Ordinary => Self::Ordinary,
            Self::Date(t) => Self::Date(*t),
            Self::Boolean(b) => Self::Boolean(*b),
            Self::Number(n) => Self::Number(*n),
            Self::String(s) => Self::String(Arc::clone(s)),
            Self::Buffer(bytes) => Self::Buffer(RwLock::new(bytes.read().clone())),
            Self::Host(host) => Self::Host(host.construct_from()?),
        })
    }
}

/// `new original.constructor(original)`
///
/// The `Object` constructor hands an object argument straight back, so an
/// ordinary object yields itself. Every other class yields a new object with
/// copied internal state and no own properties. Errors from a host
/// constructor are returned unchanged.
pub fn construct_from(original: &Arc<JsObject>) -> CloneResult<Arc<JsObject>> {
    if original.is_ordinary() {
        return Ok(Arc::clone(original));
    }
    let class = original.class().construct_from()?;
    tracing::trace!(
        target: "clone_obj",
        class = class.name(),
        "constructed opaque object from original"
    );
    Ok(Arc::new(JsObject::with_class(class)))
}
