//! Deep clone algorithm
//!
//! Produces an independent copy of a value graph:
//! - Scalars and functions are returned as-is
//! - Arrays are copied element by element
//! - Plain objects are copied descriptor by descriptor, so accessors,
//!   enumerability and symbol keys survive
//! - Opaque objects are rebuilt by their own copy constructor
//!
//! Every container clone is registered in the reference map before its
//! contents are copied. A container reached twice in one call, whether
//! through a cycle or through two aliasing properties, maps to one clone.

use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::construct::construct_from;
use crate::error::{CloneError, CloneResult};
use crate::object::{JsObject, PropertyDescriptor};
use crate::options::CloneOptions;
use crate::plain::is_plain;
use crate::value::{JsArray, Value};

/// Reusable deep cloner
///
/// The reference map lives for a single `clone` call.
#[derive(Debug, Default)]
pub struct Cloner {
    /// Map from source allocation address to its clone
    memory: FxHashMap<usize, Value>,
    options: CloneOptions,
    depth: usize,
    containers: usize,
    delegated: usize,
}

impl Cloner {
    /// Create a cloner with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cloner with the given options
    pub fn with_options(options: CloneOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Options in effect
    pub fn options(&self) -> &CloneOptions {
        &self.options
    }

    /// Deep-clone `value`
    ///
    /// Fails with `InvalidInput` for `undefined`/`null`. Errors from opaque
    /// copy constructors and from the depth limit abort the whole clone.
    pub fn clone(&mut self, value: &Value) -> CloneResult<Value> {
        if value.is_nullish() {
            return Err(CloneError::InvalidInput);
        }

        self.memory.clear();
        self.depth = 0;
        self.containers = 0;
        self.delegated = 0;

        let result = self.internal_clone(value);

        tracing::debug!(
            target: "clone_obj",
            containers = self.containers,
            delegated = self.delegated,
            ok = result.is_ok(),
            "deep clone finished"
        );

        // Drop the clones held by the map; the originals were only borrowed.
        self.memory.clear();
        result
    }

    fn internal_clone(&mut self, value: &Value) -> CloneResult<Value> {
        match value {
            Value::Undefined | Value::Null => Err(CloneError::InvalidInput),
            Value::Array(arr) => self.clone_array(arr),
            Value::Object(obj) => self.clone_object(obj),
            Value::Boolean(_)
            | Value::Number(_)
            | Value::String(_)
            | Value::Symbol(_)
            | Value::Function(_) => Ok(value.clone()),
        }
    }

    fn lookup(&self, addr: usize) -> Option<Value> {
        let hit = self.memory.get(&addr).cloned();
        if hit.is_some() {
            tracing::trace!(target: "clone_obj", addr, "reusing clone of visited container");
        }
        hit
    }

    fn enter(&mut self) -> CloneResult<()> {
        self.depth += 1;
        if let Some(limit) = self.options.max_depth {
            if self.depth > limit {
                return Err(CloneError::DepthExceeded(limit));
            }
        }
        self.containers += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn clone_array(&mut self, arr: &Arc<JsArray>) -> CloneResult<Value> {
        let addr = Arc::as_ptr(arr) as usize;
        if let Some(cloned) = self.lookup(addr) {
            return Ok(cloned);
        }
        self.enter()?;

        // Snapshot so no lock is held across the recursion
        let elements = arr.to_vec();
        let new_arr = Arc::new(JsArray::with_capacity(elements.len()));
        let new_value = Value::Array(Arc::clone(&new_arr));

        // Register before cloning elements
        self.memory.insert(addr, new_value.clone());

        for element in &elements {
            new_arr.push(self.internal_clone(element)?);
        }

        self.leave();
        Ok(new_value)
    }

    fn clone_object(&mut self, obj: &Arc<JsObject>) -> CloneResult<Value> {
        let addr = Arc::as_ptr(obj) as usize;
        if let Some(cloned) = self.lookup(addr) {
            return Ok(cloned);
        }

        if !is_plain(obj) {
            let new_value = Value::Object(construct_from(obj)?);
            self.delegated += 1;
            self.memory.insert(addr, new_value.clone());
            return Ok(new_value);
        }

        self.enter()?;

        let new_obj = Arc::new(JsObject::new());
        let new_value = Value::Object(Arc::clone(&new_obj));

        // Register before cloning properties
        self.memory.insert(addr, new_value.clone());

        for key in obj.own_keys() {
            let Some(mut desc) = obj.get_own_property(&key) else {
                continue;
            };
            // Accessors are copied as-is; their functions stay shared.
            // Nullish data values are copied, never cloned.
            if let PropertyDescriptor::Data { value, .. } = &mut desc {
                if value.is_container() {
                    *value = self.internal_clone(value)?;
                }
            }
            new_obj.define_property(key, desc);
        }

        self.leave();
        Ok(new_value)
    }
}

/// Deep-clone a value with a fresh reference map
pub fn deep_clone(value: &Value) -> CloneResult<Value> {
    Cloner::new().clone(value)
}

/// Deep-clone a value with the given options
pub fn deep_clone_with(value: &Value, options: CloneOptions) -> CloneResult<Value> {
    Cloner::with_options(options).clone(value)
}
