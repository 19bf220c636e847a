//! Dynamic values
//!
//! A `Value` is either a scalar (copied by value), or a handle to shared,
//! interior-mutable heap data (arrays, objects, functions, symbols).
//! Handles compare by identity: two values are the same reference only when
//! they point at the same allocation.

use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::CloneResult;
use crate::object::JsObject;

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(1);

/// A unique symbol, usable as a property key
#[derive(Debug)]
pub struct Symbol {
    /// Symbol description
    pub description: Option<String>,
    /// Unique ID
    pub id: u64,
}

impl Symbol {
    /// Create a fresh symbol; every call yields a distinct key
    pub fn new(description: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            description: description.map(str::to_string),
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
        })
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl std::hash::Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Native function handler: `(this, args) -> result`
pub type NativeFn = Arc<dyn Fn(&Value, &[Value]) -> CloneResult<Value> + Send + Sync>;

/// A callable value implemented in Rust
pub struct JsFunction {
    /// Function name (informational)
    pub name: String,
    func: NativeFn,
}

impl JsFunction {
    /// Wrap a closure as a function value
    pub fn new<F>(name: impl Into<String>, func: F) -> Arc<Self>
    where
        F: Fn(&Value, &[Value]) -> CloneResult<Value> + Send + Sync + 'static,
    {
        Arc::new(Self {
            name: name.into(),
            func: Arc::new(func),
        })
    }

    /// Invoke with an explicit receiver
    pub fn call(&self, this: &Value, args: &[Value]) -> CloneResult<Value> {
        (self.func)(this, args)
    }
}

impl std::fmt::Debug for JsFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[Function: {}]", self.name)
    }
}

/// Ordered, growable sequence of values
#[derive(Default)]
pub struct JsArray {
    elements: RwLock<Vec<Value>>,
}

impl JsArray {
    /// Create an array holding the given elements
    pub fn new(elements: Vec<Value>) -> Self {
        Self {
            elements: RwLock::new(elements),
        }
    }

    /// Create an empty array with room for `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(Vec::with_capacity(capacity))
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements.read().len()
    }

    /// True if the array has no elements
    pub fn is_empty(&self) -> bool {
        self.elements.read().is_empty()
    }

    /// Element at `index`, or `None` past the end
    pub fn get(&self, index: usize) -> Option<Value> {
        self.elements.read().get(index).cloned()
    }

    /// Store at `index`, padding with `undefined` when writing past the end
    pub fn set(&self, index: usize, value: Value) {
        let mut elements = self.elements.write();
        if index >= elements.len() {
            elements.resize(index + 1, Value::Undefined);
        }
        elements[index] = value;
    }

    /// Append an element
    pub fn push(&self, value: Value) {
        self.elements.write().push(value);
    }

    /// Snapshot of the current elements
    pub fn to_vec(&self) -> Vec<Value> {
        self.elements.read().clone()
    }
}

impl std::fmt::Debug for JsArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsArray").field("length", &self.len()).finish()
    }
}

/// A dynamic value
#[derive(Clone, Default)]
pub enum Value {
    /// `undefined`
    #[default]
    Undefined,
    /// `null`
    Null,
    /// Boolean primitive
    Boolean(bool),
    /// Number primitive
    Number(f64),
    /// String primitive
    String(Arc<str>),
    /// Symbol primitive
    Symbol(Arc<Symbol>),
    /// Callable
    Function(Arc<JsFunction>),
    /// Sequence
    Array(Arc<JsArray>),
    /// Object (plain or opaque)
    Object(Arc<JsObject>),
}

impl Value {
    /// Create undefined value
    pub const fn undefined() -> Self {
        Self::Undefined
    }

    /// Create null value
    pub const fn null() -> Self {
        Self::Null
    }

    /// Create boolean value
    pub const fn boolean(b: bool) -> Self {
        Self::Boolean(b)
    }

    /// Create number value
    pub const fn number(n: f64) -> Self {
        Self::Number(n)
    }

    /// Create string value
    pub fn string(s: &str) -> Self {
        Self::String(Arc::from(s))
    }

    /// Wrap a symbol
    pub fn symbol(symbol: Arc<Symbol>) -> Self {
        Self::Symbol(symbol)
    }

    /// Wrap a function
    pub fn function(func: Arc<JsFunction>) -> Self {
        Self::Function(func)
    }

    /// Wrap an object
    pub fn object(obj: Arc<JsObject>) -> Self {
        Self::Object(obj)
    }

    /// Create a new array value from elements
    pub fn array(elements: Vec<Value>) -> Self {
        Self::Array(Arc::new(JsArray::new(elements)))
    }

    /// Check for undefined
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Check for null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check for null or undefined
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    /// Check for an array or object
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Object(_))
    }

    /// Get boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get string contents
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get symbol
    pub fn as_symbol(&self) -> Option<&Arc<Symbol>> {
        match self {
            Self::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Get function
    pub fn as_function(&self) -> Option<&Arc<JsFunction>> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Get array
    pub fn as_array(&self) -> Option<&Arc<JsArray>> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get object
    pub fn as_object(&self) -> Option<&Arc<JsObject>> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Address of the referenced allocation, for handle kinds
    pub fn heap_addr(&self) -> Option<usize> {
        match self {
            Self::Symbol(s) => Some(Arc::as_ptr(s) as usize),
            Self::Function(f) => Some(Arc::as_ptr(f) as usize),
            Self::Array(a) => Some(Arc::as_ptr(a) as usize),
            Self::Object(o) => Some(Arc::as_ptr(o) as usize),
            _ => None,
        }
    }

    /// True if both values are handles to the same allocation
    pub fn same_ref(&self, other: &Value) -> bool {
        match (self.heap_addr(), other.heap_addr()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Get the type name (for typeof)
    pub fn type_of(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "object",
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::Function(_) => "function",
            Self::Array(_) | Self::Object(_) => "object",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

impl From<Arc<JsObject>> for Value {
    fn from(obj: Arc<JsObject>) -> Self {
        Self::Object(obj)
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "\"{}\"", s),
            Self::Symbol(s) => match &s.description {
                Some(desc) => write!(f, "Symbol({})", desc),
                None => write!(f, "Symbol()"),
            },
            Self::Function(func) => write!(f, "{:?}", func),
            Self::Array(a) => write!(f, "[object Array({})]", a.len()),
            Self::Object(o) => write!(f, "[object {}]", o.class_name()),
        }
    }
}

/// Strict equality: scalars by value (NaN != NaN), handles by identity
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            _ => self.same_ref(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nullish() {
        assert!(Value::undefined().is_nullish());
        assert!(Value::null().is_nullish());
        assert!(!Value::number(0.0).is_nullish());
        assert_eq!(Value::null().type_of(), "object");
    }

    #[test]
    fn test_nan_is_not_equal_to_itself() {
        let v = Value::number(f64::NAN);
        assert_ne!(v, v.clone());
    }

    #[test]
    fn test_strings_compare_by_content() {
        assert_eq!(Value::string("foo"), Value::from("foo"));
    }

    #[test]
    fn test_arrays_compare_by_identity() {
        let a = Value::array(vec![Value::number(1.0)]);
        let b = Value::array(vec![Value::number(1.0)]);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_symbols_are_unique() {
        let a = Symbol::new(Some("foo"));
        let b = Symbol::new(Some("foo"));
        assert_ne!(a, b);
        assert_ne!(Value::symbol(a.clone()), Value::symbol(b));
        assert_eq!(Value::symbol(a.clone()), Value::symbol(a));
    }

    #[test]
    fn test_array_set_pads_with_undefined() {
        let arr = JsArray::default();
        arr.set(2, Value::number(3.0));
        assert_eq!(arr.len(), 3);
        assert!(arr.get(0).unwrap().is_undefined());
        assert_eq!(arr.get(2), Some(Value::number(3.0)));
        assert_eq!(arr.get(3), None);
    }

    #[test]
    fn test_function_call_receives_this() {
        let f = JsFunction::new("identity", |this, _| Ok(this.clone()));
        let this = Value::string("receiver");
        assert_eq!(f.call(&this, &[]).unwrap(), this);
        assert_eq!(f.name, "identity");
    }

    #[test]
    fn test_accessors_match_variant() {
        assert_eq!(Value::from(true).as_boolean(), Some(true));
        assert_eq!(Value::from(3).as_number(), Some(3.0));
        assert_eq!(Value::number(1.0).as_boolean(), None);

        let sym = Symbol::new(None);
        assert_eq!(Value::symbol(sym.clone()).as_symbol(), Some(&sym));
        assert!(Value::string("s").as_symbol().is_none());

        let f = JsFunction::new("f", |_, _| Ok(Value::Undefined));
        let value = Value::function(f.clone());
        assert!(Arc::ptr_eq(value.as_function().unwrap(), &f));
        assert!(value.as_object().is_none());
        assert_eq!(value.type_of(), "function");
    }

    #[test]
    fn test_value_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Value>();
    }
}
