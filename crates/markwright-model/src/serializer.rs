//! Value serialization and instance conversion contracts.

use std::fmt;

use thiserror::Error;

use crate::types::TypeRef;
use crate::value::{MarkupInstance, Value};

/// Failure converting a value to its string form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot convert value of type {type_name} to string: {reason}")]
pub struct ConvertError {
    /// Full name of the value's type.
    pub type_name: String,
    /// Why the conversion failed.
    pub reason: String,
}

impl ConvertError {
    /// Create a conversion error.
    pub fn new(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }
}

/// Converts values of a type to string form for attributes and text content.
pub trait ValueSerializer: fmt::Debug + Send + Sync {
    /// Whether this particular value has a string form.
    fn can_convert_to_string(&self, value: &Value) -> bool;

    /// The string form of `value`.
    fn convert_to_string(&self, value: &Value) -> Result<String, ConvertError>;

    /// Types the string form refers to by prefix (for example a type name
    /// written as `p:Name`). Their namespaces must be declared in scope.
    fn type_references(&self, _value: &Value) -> Vec<TypeRef> {
        Vec::new()
    }
}

/// Serializer for string values: the text is the value.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSerializer;

impl ValueSerializer for TextSerializer {
    fn can_convert_to_string(&self, value: &Value) -> bool {
        matches!(value, Value::String(_))
    }

    fn convert_to_string(&self, value: &Value) -> Result<String, ConvertError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(ConvertError::new(describe(other), "not a string")),
        }
    }
}

/// Serializer for booleans and numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveSerializer;

impl ValueSerializer for PrimitiveSerializer {
    fn can_convert_to_string(&self, value: &Value) -> bool {
        matches!(value, Value::Bool(_) | Value::Int(_) | Value::Float(_))
    }

    fn convert_to_string(&self, value: &Value) -> Result<String, ConvertError> {
        match value {
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => Ok(value.text()),
            other => Err(ConvertError::new(describe(other), "not a primitive")),
        }
    }
}

/// Text form of a double, spelling infinities the way markup loaders parse them.
pub(crate) fn format_double(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_owned()
    } else if value.is_infinite() {
        if value > 0.0 {
            "Infinity".to_owned()
        } else {
            "-Infinity".to_owned()
        }
    } else {
        value.to_string()
    }
}

fn describe(value: &Value) -> String {
    value
        .runtime_type()
        .map_or_else(|| "null".to_owned(), |ty| ty.full_name())
}

/// One positional constructor argument of an [`InstanceDescriptor`].
#[derive(Debug, Clone)]
pub struct ConstructorArgument {
    /// Parameter name.
    pub name: String,
    /// Declared parameter type.
    pub parameter_type: TypeRef,
    /// Argument value.
    pub value: Value,
}

/// How to rebuild an instance through a constructor call.
#[derive(Debug, Clone, Default)]
pub struct InstanceDescriptor {
    /// Arguments in parameter order.
    pub arguments: Vec<ConstructorArgument>,
}

/// Failure from an [`InstanceConverter`].
///
/// The writer treats both variants as "no descriptor available".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConverterError {
    /// The converter cannot describe this instance right now.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    /// The converter never describes instances like this one.
    #[error("not supported: {0}")]
    NotSupported(String),
}

/// Maps an instance onto a constructor-argument form.
pub trait InstanceConverter: fmt::Debug + Send + Sync {
    /// Describe `instance` as a constructor call, if it has such a form.
    fn to_instance_descriptor(
        &self,
        instance: &dyn MarkupInstance,
    ) -> Result<Option<InstanceDescriptor>, ConverterError>;
}
