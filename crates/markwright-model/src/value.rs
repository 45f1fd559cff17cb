//! Runtime values and the instance contract.

use std::fmt;
use std::sync::Arc;

use crate::builtin;
use crate::property::PropertyDescriptor;
use crate::serializer::format_double;
use crate::types::TypeRef;

/// Shared handle to an object in the graph.
pub type ObjectRef = Arc<dyn MarkupInstance>;

/// An object the writer can serialize.
///
/// Implementations report their type metadata and the current values of
/// their properties. Collection types return `Some` from [`items`], keyed
/// collections from [`entries`].
///
/// [`items`]: MarkupInstance::items
/// [`entries`]: MarkupInstance::entries
pub trait MarkupInstance: fmt::Debug + Send + Sync {
    /// The runtime type.
    fn type_info(&self) -> TypeRef;

    /// Reflected properties, in declaration order.
    fn properties(&self) -> Vec<PropertyDescriptor>;

    /// Current value of `property`.
    fn value(&self, property: &PropertyDescriptor) -> Value;

    /// Items, if the instance is enumerable.
    fn items(&self) -> Option<Vec<Value>> {
        None
    }

    /// Key/value entries, if the instance is a dictionary.
    fn entries(&self) -> Option<Vec<(Value, Value)>> {
        None
    }

    /// Display text of the instance; used to order dictionary entries.
    fn text(&self) -> String {
        self.type_info().full_name()
    }
}

/// A value in the object graph.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent value; written as `x:Null`.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Double-precision number.
    Float(f64),
    /// String.
    String(String),
    /// Reference to a host object.
    Object(ObjectRef),
}

impl Value {
    /// The runtime type; `None` for null.
    #[must_use]
    pub fn runtime_type(&self) -> Option<TypeRef> {
        match self {
            Self::Null => None,
            Self::Bool(_) => Some(builtin::boolean()),
            Self::Int(_) => Some(builtin::int64()),
            Self::Float(_) => Some(builtin::double()),
            Self::String(_) => Some(builtin::string()),
            Self::Object(o) => Some(o.type_info()),
        }
    }

    /// Whether this is [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether this is a string.
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// The string, if this is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The object reference, if this is one.
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Whether the runtime type is a markup extension.
    #[must_use]
    pub fn is_markup_extension(&self) -> bool {
        self.as_object()
            .is_some_and(|o| o.type_info().is_markup_extension)
    }

    /// Items of an enumerable object.
    #[must_use]
    pub fn items(&self) -> Option<Vec<Value>> {
        self.as_object().and_then(|o| o.items())
    }

    /// Entries of a dictionary object.
    #[must_use]
    pub fn entries(&self) -> Option<Vec<(Value, Value)>> {
        self.as_object().and_then(|o| o.entries())
    }

    /// Whether the value is an enumerable object with nothing in it.
    #[must_use]
    pub fn is_empty_collection(&self) -> bool {
        match self.as_object() {
            Some(o) => {
                o.items().is_some_and(|items| items.is_empty())
                    || o.entries().is_some_and(|entries| entries.is_empty())
            }
            None => false,
        }
    }

    /// Display text; null displays as the empty string.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(true) => "True".to_owned(),
            Self::Bool(false) => "False".to_owned(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => format_double(*f),
            Self::String(s) => s.clone(),
            Self::Object(o) => o.text(),
        }
    }
}

impl PartialEq for Value {
    /// Primitives compare by value, objects by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<ObjectRef> for Value {
    fn from(value: ObjectRef) -> Self {
        Self::Object(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
