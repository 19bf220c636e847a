//! # clone-obj
//!
//! Deep cloning for dynamic object graphs.
//!
//! ## Design Principles
//!
//! - **Descriptor fidelity**: properties are copied with their full
//!   descriptor, so accessors, non-enumerable and symbol-keyed properties
//!   survive the clone
//! - **Identity preservation**: cycles and shared sub-objects map to one
//!   clone each, tracked by an identity-keyed reference map
//! - **Delegated copies**: opaque objects (dates, boxed primitives, buffers,
//!   host class instances) are rebuilt by their own copy constructor
//!
//! ```
//! use clone_obj::{deep_clone, JsObject, Value};
//! use std::sync::Arc;
//!
//! let config = Arc::new(JsObject::new());
//! config.set("retries".into(), Value::number(3.0)).unwrap();
//! let original = Value::object(config);
//!
//! let copy = deep_clone(&original).unwrap();
//! copy.as_object().unwrap().set("retries".into(), Value::number(5.0)).unwrap();
//!
//! let retries = original.as_object().unwrap().get(&"retries".into()).unwrap();
//! assert_eq!(retries, Value::number(3.0));
//! ```

#![warn(clippy::all)]
#![warn(missing_docs)]

pub mod cloner;
pub mod construct;
pub mod error;
pub mod json;
pub mod object;
pub mod options;
pub mod plain;
pub mod value;

pub use cloner::{Cloner, deep_clone, deep_clone_with};
pub use construct::{HostObject, construct_from};
pub use error::{CloneError, CloneResult};
pub use object::{JsObject, ObjectClass, PropertyAttributes, PropertyDescriptor, PropertyKey};
pub use options::CloneOptions;
pub use plain::{is_plain, is_plain_object};
pub use value::{JsArray, JsFunction, NativeFn, Symbol, Value};
