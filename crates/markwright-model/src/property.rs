//! Reflective property metadata.

use std::fmt;
use std::sync::Arc;

use typed_builder::TypedBuilder;

use crate::serializer::ValueSerializer;
use crate::types::{TypeInfo, TypeRef};
use crate::value::{MarkupInstance, Value};

/// Serialization visibility declared on a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SerializationVisibility {
    /// Serialized when its value differs from the default.
    #[default]
    Visible,
    /// Never serialized.
    Hidden,
    /// Serialized through its contents, even when read-only.
    Content,
}

/// Metadata of one property on a type.
#[derive(Debug, Clone, TypedBuilder)]
pub struct PropertyDescriptor {
    /// Member name.
    #[builder(setter(into))]
    pub name: String,

    /// Declared type of the property.
    pub property_type: TypeRef,

    /// Type that declares the property. Should-serialize predicates are
    /// looked up on this type.
    #[builder(default, setter(strip_option))]
    pub declaring_type: Option<TypeRef>,

    /// Owner of an attached property.
    #[builder(default, setter(strip_option))]
    pub attached_owner: Option<TypeRef>,

    /// Whether the property has no setter.
    #[builder(default)]
    pub read_only: bool,

    #[builder(default)]
    pub visibility: SerializationVisibility,

    /// Force attribute form, even for markup extension values.
    #[builder(default)]
    pub serialize_as_attribute: bool,

    /// Write as a markup-language directive, `x:{name}`.
    #[builder(default, setter(into, strip_option))]
    pub directive: Option<String>,

    /// Write as `xml:lang`.
    #[builder(default)]
    pub is_language: bool,

    /// Constructor parameter this property maps to, if any.
    #[builder(default, setter(into, strip_option))]
    pub constructor_argument: Option<String>,

    /// Names of properties that must be written before this one.
    #[builder(default)]
    pub depends_on: Vec<String>,

    /// Declared default value. `None` means there is no default.
    #[builder(default, setter(strip_option))]
    pub default_value: Option<Value>,

    /// Serializer overriding the one of the property type.
    #[builder(default, setter(strip_option))]
    pub value_serializer: Option<Arc<dyn ValueSerializer>>,
}

impl PropertyDescriptor {
    /// Whether this is an attached property owned by a type other than
    /// `instance_type` (or one of its bases).
    #[must_use]
    pub fn is_attached_to(&self, instance_type: &TypeInfo) -> bool {
        self.attached_owner
            .as_ref()
            .is_some_and(|owner| !owner.is_assignable_from(instance_type))
    }

    /// Whether the declared default is absent or null.
    #[must_use]
    pub fn has_null_default(&self) -> bool {
        matches!(self.default_value, None | Some(Value::Null))
    }
}

/// Predicate deciding whether a property is worth serializing on a given
/// instance. Overrides the default-value comparison.
#[derive(Clone)]
pub struct ShouldSerialize(Arc<dyn Fn(&dyn MarkupInstance) -> bool + Send + Sync>);

impl ShouldSerialize {
    pub fn new(predicate: impl Fn(&dyn MarkupInstance) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    #[must_use]
    pub fn check(&self, instance: &dyn MarkupInstance) -> bool {
        (self.0)(instance)
    }
}

impl fmt::Debug for ShouldSerialize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ShouldSerialize(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin;
    use crate::types::ModuleInfo;

    fn owner() -> TypeRef {
        TypeInfo::builder()
            .name("Grid")
            .namespace("Demo")
            .module(ModuleInfo::new("demo").into_ref())
            .build()
            .into_ref()
    }

    #[test]
    fn test_should_detect_foreign_attached_owner() {
        let row = PropertyDescriptor::builder()
            .name("Row")
            .property_type(builtin::int64())
            .attached_owner(owner())
            .build();
        let button = TypeInfo::builder()
            .name("Button")
            .namespace("Demo")
            .module(ModuleInfo::new("demo").into_ref())
            .build();

        assert!(row.is_attached_to(&button));
        assert!(!row.is_attached_to(&owner()));
    }

    #[test]
    fn test_should_treat_missing_default_as_null() {
        let name = PropertyDescriptor::builder()
            .name("Name")
            .property_type(builtin::string())
            .build();
        assert!(name.has_null_default());

        let width = PropertyDescriptor::builder()
            .name("Width")
            .property_type(builtin::double())
            .default_value(Value::Float(0.0))
            .build();
        assert!(!width.has_null_default());
    }
}
