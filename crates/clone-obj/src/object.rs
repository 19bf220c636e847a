//! Objects with ordered, descriptor-level properties
//!
//! Every own property carries a full descriptor (data or accessor, plus
//! writable/enumerable/configurable flags). An object also has a class slot
//! that tells ordinary (plain) objects apart from dates, boxed primitives,
//! byte buffers and host class instances.

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::construct::HostObject;
use crate::error::CloneResult;
use crate::value::{JsFunction, Symbol, Value};

/// Property key (string or symbol)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// String property key
    String(Arc<str>),
    /// Symbol property key
    Symbol(Arc<Symbol>),
}

impl PropertyKey {
    /// Create a string property key
    pub fn string(s: &str) -> Self {
        Self::String(Arc::from(s))
    }

    /// Create a symbol property key
    pub fn symbol(symbol: &Arc<Symbol>) -> Self {
        Self::Symbol(Arc::clone(symbol))
    }

    /// String contents, if this is a string key
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Symbol(_) => None,
        }
    }

    /// Canonical array index (`"0"`, `"1"`, ...) if this key is one
    fn array_index(&self) -> Option<u32> {
        let s = self.as_str()?;
        let n: u32 = s.parse().ok()?;
        (n != u32::MAX && n.to_string() == s).then_some(n)
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

impl From<&Arc<Symbol>> for PropertyKey {
    fn from(symbol: &Arc<Symbol>) -> Self {
        Self::symbol(symbol)
    }
}

/// Property attributes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PropertyAttributes {
    /// Property is writable (ignored for accessors)
    pub writable: bool,
    /// Property is enumerable
    pub enumerable: bool,
    /// Property is configurable
    pub configurable: bool,
}

impl PropertyAttributes {
    /// Attributes of a property created by plain assignment
    pub const fn data() -> Self {
        Self {
            writable: true,
            enumerable: true,
            configurable: true,
        }
    }

    /// Non-writable, non-enumerable, non-configurable
    pub const fn frozen() -> Self {
        Self {
            writable: false,
            enumerable: false,
            configurable: false,
        }
    }

    /// Attributes of an accessor declared in an object literal
    pub const fn accessor() -> Self {
        Self {
            writable: false,
            enumerable: true,
            configurable: true,
        }
    }
}

/// Property descriptor
#[derive(Clone, Debug)]
pub enum PropertyDescriptor {
    /// Data property
    Data {
        /// The value
        value: Value,
        /// Attributes
        attributes: PropertyAttributes,
    },
    /// Accessor property
    Accessor {
        /// Getter function
        get: Option<Arc<JsFunction>>,
        /// Setter function
        set: Option<Arc<JsFunction>>,
        /// Attributes
        attributes: PropertyAttributes,
    },
}

impl PropertyDescriptor {
    /// Create a data property with default attributes
    pub fn data(value: Value) -> Self {
        Self::Data {
            value,
            attributes: PropertyAttributes::data(),
        }
    }

    /// Create a data property with specific attributes
    pub fn data_with_attrs(value: Value, attributes: PropertyAttributes) -> Self {
        Self::Data { value, attributes }
    }

    /// Create an accessor property with object-literal attributes
    pub fn accessor(get: Option<Arc<JsFunction>>, set: Option<Arc<JsFunction>>) -> Self {
        Self::Accessor {
            get,
            set,
            attributes: PropertyAttributes::accessor(),
        }
    }

    /// Get the value (for data properties)
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Data { value, .. } => Some(value),
            Self::Accessor { .. } => None,
        }
    }

    /// Get value mutably
    pub fn value_mut(&mut self) -> Option<&mut Value> {
        match self {
            Self::Data { value, .. } => Some(value),
            Self::Accessor { .. } => None,
        }
    }

    /// Attributes of either kind
    pub fn attributes(&self) -> PropertyAttributes {
        match self {
            Self::Data { attributes, .. } | Self::Accessor { attributes, .. } => *attributes,
        }
    }

    /// Check if this is an accessor property
    pub fn is_accessor(&self) -> bool {
        matches!(self, Self::Accessor { .. })
    }

    /// Check if writable
    pub fn is_writable(&self) -> bool {
        match self {
            Self::Data { attributes, .. } => attributes.writable,
            Self::Accessor { .. } => false,
        }
    }

    /// Check if enumerable
    pub fn is_enumerable(&self) -> bool {
        self.attributes().enumerable
    }

    /// Check if configurable
    pub fn is_configurable(&self) -> bool {
        self.attributes().configurable
    }
}

/// What kind of object this is, and its internal state
pub enum ObjectClass {
    /// Plain object
    Ordinary,
    /// Date holding a time value in milliseconds since the epoch (NaN if invalid)
    Date(f64),
    /// Boxed boolean
    Boolean(bool),
    /// Boxed number
    Number(f64),
    /// Boxed string
    String(Arc<str>),
    /// Mutable byte buffer
    Buffer(RwLock<Vec<u8>>),
    /// Instance of a host-defined class
    Host(Box<dyn HostObject>),
}

impl ObjectClass {
    /// Constructor name of this class
    pub fn name(&self) -> &str {
        match self {
            Self::Ordinary => "Object",
            Self::Date(_) => "Date",
            Self::Boolean(_) => "Boolean",
            Self::Number(_) => "Number",
            Self::String(_) => "String",
            Self::Buffer(_) => "Buffer",
            Self::Host(host) => host.class_name(),
        }
    }
}

impl std::fmt::Debug for ObjectClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ordinary => write!(f, "Ordinary"),
            Self::Date(t) => write!(f, "Date({})", t),
            Self::Boolean(b) => write!(f, "Boolean({})", b),
            Self::Number(n) => write!(f, "Number({})", n),
            Self::String(s) => write!(f, "String({:?})", s),
            Self::Buffer(bytes) => write!(f, "Buffer({})", bytes.read().len()),
            Self::Host(host) => write!(f, "Host({:?})", host),
        }
    }
}

/// An object
///
/// Thread-safe with interior mutability. Always handled through `Arc`, whose
/// identity is the object's identity.
pub struct JsObject {
    /// Own properties in insertion order
    properties: RwLock<IndexMap<PropertyKey, PropertyDescriptor>>,
    /// Class and internal slots
    class: ObjectClass,
}

impl JsObject {
    /// Create a new empty plain object
    pub fn new() -> Self {
        Self::with_class(ObjectClass::Ordinary)
    }

    /// Create an object of the given class with no own properties
    pub fn with_class(class: ObjectClass) -> Self {
        Self {
            properties: RwLock::new(IndexMap::new()),
            class,
        }
    }

    /// `new Date(ms)`
    pub fn date(time_value: f64) -> Self {
        Self::with_class(ObjectClass::Date(time_value))
    }

    /// `new Boolean(b)`
    pub fn boxed_boolean(b: bool) -> Self {
        Self::with_class(ObjectClass::Boolean(b))
    }

    /// `new Number(n)`
    pub fn boxed_number(n: f64) -> Self {
        Self::with_class(ObjectClass::Number(n))
    }

    /// `new String(s)`
    pub fn boxed_string(s: &str) -> Self {
        Self::with_class(ObjectClass::String(Arc::from(s)))
    }

    /// Byte buffer holding a copy of `bytes`
    pub fn buffer(bytes: &[u8]) -> Self {
        Self::with_class(ObjectClass::Buffer(RwLock::new(bytes.to_vec())))
    }

    /// Wrap a host class instance
    pub fn host(instance: Box<dyn HostObject>) -> Self {
        Self::with_class(ObjectClass::Host(instance))
    }

    /// Class slot
    pub fn class(&self) -> &ObjectClass {
        &self.class
    }

    /// Constructor name
    pub fn class_name(&self) -> &str {
        self.class.name()
    }

    /// True for objects built through the ordinary object path
    pub fn is_ordinary(&self) -> bool {
        matches!(self.class, ObjectClass::Ordinary)
    }

    /// Downcast a host instance to its concrete type
    pub fn host_ref<T: HostObject>(&self) -> Option<&T> {
        match &self.class {
            ObjectClass::Host(host) => host.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Primitive value of a date, boxed primitive or host instance
    pub fn value_of(&self) -> Option<Value> {
        match &self.class {
            ObjectClass::Ordinary | ObjectClass::Buffer(_) => None,
            ObjectClass::Date(t) | ObjectClass::Number(t) => Some(Value::number(*t)),
            ObjectClass::Boolean(b) => Some(Value::boolean(*b)),
            ObjectClass::String(s) => Some(Value::String(Arc::clone(s))),
            ObjectClass::Host(host) => host.value_of(),
        }
    }

    /// Time value of a date
    pub fn time_value(&self) -> Option<f64> {
        match self.class {
            ObjectClass::Date(t) => Some(t),
            _ => None,
        }
    }

    /// Copy of a buffer's bytes
    pub fn buffer_bytes(&self) -> Option<Vec<u8>> {
        match &self.class {
            ObjectClass::Buffer(bytes) => Some(bytes.read().clone()),
            _ => None,
        }
    }

    /// Overwrite one byte of a buffer; false if not a buffer or out of range
    pub fn write_buffer(&self, index: usize, byte: u8) -> bool {
        match &self.class {
            ObjectClass::Buffer(bytes) => match bytes.write().get_mut(index) {
                Some(slot) => {
                    *slot = byte;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Own property descriptor
    pub fn get_own_property(&self, key: &PropertyKey) -> Option<PropertyDescriptor> {
        self.properties.read().get(key).cloned()
    }

    /// Define a property with a descriptor, verbatim
    ///
    /// Fails (returns false) only when replacing a non-configurable property.
    pub fn define_property(&self, key: PropertyKey, desc: PropertyDescriptor) -> bool {
        let mut props = self.properties.write();
        if let Some(existing) = props.get(&key) {
            if !existing.is_configurable() {
                return false;
            }
        }
        props.insert(key, desc);
        true
    }

    /// Check if object has own property
    pub fn has_own(&self, key: &PropertyKey) -> bool {
        self.properties.read().contains_key(key)
    }

    /// Own property keys: array indices ascending, other strings in
    /// insertion order, then symbols in insertion order
    pub fn own_keys(&self) -> Vec<PropertyKey> {
        let props = self.properties.read();
        let mut indices: Vec<(u32, PropertyKey)> = Vec::new();
        let mut strings = Vec::new();
        let mut symbols = Vec::new();

        for key in props.keys() {
            match key {
                PropertyKey::Symbol(_) => symbols.push(key.clone()),
                PropertyKey::String(_) => match key.array_index() {
                    Some(i) => indices.push((i, key.clone())),
                    None => strings.push(key.clone()),
                },
            }
        }

        indices.sort_by_key(|(i, _)| *i);
        indices
            .into_iter()
            .map(|(_, key)| key)
            .chain(strings)
            .chain(symbols)
            .collect()
    }

    /// Enumerable own string keys (`Object.keys`)
    pub fn keys(&self) -> Vec<PropertyKey> {
        let keys = self.own_keys();
        let props = self.properties.read();
        keys.into_iter()
            .filter(|key| {
                matches!(key, PropertyKey::String(_))
                    && props.get(key).is_some_and(|d| d.is_enumerable())
            })
            .collect()
    }

    /// Number of own properties
    pub fn property_count(&self) -> usize {
        self.properties.read().len()
    }

    /// Read a property, running its getter with this object as receiver
    pub fn get(self: &Arc<Self>, key: &PropertyKey) -> CloneResult<Value> {
        // Release the lock before calling out: getters may touch this object.
        let desc = self.get_own_property(key);
        match desc {
            None => Ok(Value::Undefined),
            Some(PropertyDescriptor::Data { value, .. }) => Ok(value),
            Some(PropertyDescriptor::Accessor { get: None, .. }) => Ok(Value::Undefined),
            Some(PropertyDescriptor::Accessor { get: Some(getter), .. }) => {
                getter.call(&Value::Object(Arc::clone(self)), &[])
            }
        }
    }

    /// Assign a property, running its setter with this object as receiver
    ///
    /// Returns false when the write is rejected (read-only data property or
    /// accessor without a setter).
    pub fn set(self: &Arc<Self>, key: PropertyKey, value: Value) -> CloneResult<bool> {
        let desc = self.get_own_property(&key);
        match desc {
            Some(PropertyDescriptor::Accessor { set: Some(setter), .. }) => {
                setter.call(&Value::Object(Arc::clone(self)), &[value])?;
                Ok(true)
            }
            Some(PropertyDescriptor::Accessor { set: None, .. }) => Ok(false),
            Some(PropertyDescriptor::Data { attributes, .. }) => {
                if !attributes.writable {
                    return Ok(false);
                }
                self.properties
                    .write()
                    .insert(key, PropertyDescriptor::data_with_attrs(value, attributes));
                Ok(true)
            }
            None => {
                self.properties
                    .write()
                    .insert(key, PropertyDescriptor::data(value));
                Ok(true)
            }
        }
    }

    /// Delete an own property; false if it is non-configurable
    pub fn delete(&self, key: &PropertyKey) -> bool {
        let mut props = self.properties.write();
        let configurable = match props.get(key) {
            Some(desc) => desc.is_configurable(),
            None => return true,
        };
        if configurable {
            props.shift_remove(key);
        }
        configurable
    }
}

impl Default for JsObject {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for JsObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let props = self.properties.read();
        f.debug_struct("JsObject")
            .field("class", &self.class)
            .field("properties", &props.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CloneError;

    fn expect_number(args: &[Value]) -> CloneResult<f64> {
        args.first()
            .and_then(Value::as_number)
            .ok_or_else(|| CloneError::type_error("requires a number"))
    }

    #[test]
    fn test_object_get_set() {
        let obj = Arc::new(JsObject::new());

        assert!(obj.set(PropertyKey::string("foo"), Value::number(42.0)).unwrap());
        assert_eq!(
            obj.get(&PropertyKey::string("foo")).unwrap(),
            Value::number(42.0)
        );
        assert!(obj.get(&"missing".into()).unwrap().is_undefined());
    }

    #[test]
    fn test_read_only_property_rejects_write() {
        let obj = Arc::new(JsObject::new());
        obj.define_property(
            "frozen".into(),
            PropertyDescriptor::data_with_attrs(Value::number(1.0), PropertyAttributes::frozen()),
        );

        assert!(!obj.set("frozen".into(), Value::number(2.0)).unwrap());
        assert_eq!(obj.get(&"frozen".into()).unwrap(), Value::number(1.0));
        assert!(!obj.delete(&"frozen".into()));
        assert!(!obj.define_property("frozen".into(), PropertyDescriptor::data(Value::Null)));
    }

    #[test]
    fn test_accessor_uses_receiver() {
        let obj = Arc::new(JsObject::new());
        let getter = JsFunction::new("get", |this, _| {
            let this = this.as_object().cloned().unwrap_or_default();
            let backing = this.get(&"_x".into())?;
            Ok(Value::number(backing.as_number().unwrap_or(f64::NAN) + 1.0))
        });
        let setter = JsFunction::new("set", |this, args| {
            let n = expect_number(args)?;
            if let Some(this) = this.as_object() {
                this.set("_x".into(), Value::number(n))?;
            }
            Ok(Value::Undefined)
        });
        obj.define_property("x".into(), PropertyDescriptor::accessor(Some(getter), Some(setter)));

        assert!(obj.get(&"x".into()).unwrap().as_number().unwrap().is_nan());
        obj.set("x".into(), Value::number(1.0)).unwrap();
        assert_eq!(obj.get(&"x".into()).unwrap(), Value::number(2.0));

        let err = obj.set("x".into(), Value::boolean(true)).unwrap_err();
        assert_eq!(err.to_string(), "requires a number");
    }

    #[test]
    fn test_own_keys_order() {
        let obj = Arc::new(JsObject::new());
        let sym = Symbol::new(Some("s"));
        obj.set("b".into(), Value::Null).unwrap();
        obj.set(PropertyKey::symbol(&sym), Value::Null).unwrap();
        obj.set("10".into(), Value::Null).unwrap();
        obj.set("a".into(), Value::Null).unwrap();
        obj.set("2".into(), Value::Null).unwrap();
        obj.set("02".into(), Value::Null).unwrap();

        let keys = obj.own_keys();
        let expected: Vec<PropertyKey> = vec![
            "2".into(),
            "10".into(),
            "b".into(),
            "a".into(),
            "02".into(),
            PropertyKey::symbol(&sym),
        ];
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_descriptor_value_mut() {
        let mut desc = PropertyDescriptor::data(Value::number(1.0));
        if let Some(value) = desc.value_mut() {
            *value = Value::number(2.0);
        }
        assert_eq!(desc.value(), Some(&Value::number(2.0)));
        assert!(desc.is_writable());

        let mut accessor = PropertyDescriptor::accessor(None, None);
        assert!(accessor.value_mut().is_none());
        assert!(!accessor.is_writable());
    }

    #[test]
    fn test_keys_skips_non_enumerable_and_symbols() {
        let obj = Arc::new(JsObject::new());
        obj.set("visible".into(), Value::Null).unwrap();
        obj.set(PropertyKey::symbol(&Symbol::new(None)), Value::Null).unwrap();
        obj.define_property(
            "hidden".into(),
            PropertyDescriptor::data_with_attrs(Value::Null, PropertyAttributes::frozen()),
        );

        assert_eq!(obj.keys(), vec![PropertyKey::string("visible")]);
        assert_eq!(obj.property_count(), 3);
    }

    #[test]
    fn test_value_of_boxed() {
        assert_eq!(JsObject::boxed_string("foo").value_of(), Some(Value::string("foo")));
        assert_eq!(JsObject::boxed_boolean(true).value_of(), Some(Value::boolean(true)));
        assert_eq!(JsObject::boxed_number(1.0).value_of(), Some(Value::number(1.0)));
        assert_eq!(JsObject::date(5.0).value_of(), Some(Value::number(5.0)));
        assert_eq!(JsObject::new().value_of(), None);
    }

    #[test]
    fn test_buffer_write() {
        let buf = JsObject::buffer(b"foo");
        assert!(buf.write_buffer(0, b'b'));
        assert!(!buf.write_buffer(3, b'x'));
        assert_eq!(buf.buffer_bytes().unwrap(), b"boo".to_vec());
        assert_eq!(buf.class_name(), "Buffer");
    }

    #[test]
    fn test_object_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JsObject>();
    }
}
