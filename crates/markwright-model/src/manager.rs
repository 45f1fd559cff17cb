//! Per-type and per-property lookup of serialization services.

use std::fmt;
use std::sync::Arc;

use markwright_core::XmlNamespace;

use crate::property::PropertyDescriptor;
use crate::serializer::ValueSerializer;
use crate::types::TypeInfo;

/// Resolves serialization services for types and properties.
///
/// The default methods read the metadata attached to [`TypeInfo`] and
/// [`PropertyDescriptor`]. Hosts override them to supply serializers or
/// namespaces from elsewhere.
pub trait SerializationManager: fmt::Debug + Send + Sync {
    /// Value serializer for values of `ty`.
    fn value_serializer_for(&self, ty: &TypeInfo) -> Option<Arc<dyn ValueSerializer>> {
        ty.value_serializer.clone()
    }

    /// Value serializer for `property`: the property's own, else its type's.
    fn value_serializer_for_property(
        &self,
        property: &PropertyDescriptor,
    ) -> Option<Arc<dyn ValueSerializer>> {
        property
            .value_serializer
            .clone()
            .or_else(|| self.value_serializer_for(&property.property_type))
    }

    /// XML namespace of `ty`.
    fn xml_namespace_of(&self, ty: &TypeInfo) -> XmlNamespace {
        ty.xml_namespace()
    }
}

/// Manager using only the metadata carried by the object model.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSerializationManager;

impl SerializationManager for DefaultSerializationManager {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;
    use crate::builtin;
    use crate::serializer::TextSerializer;

    #[test]
    fn test_should_prefer_property_serializer() {
        let manager = DefaultSerializationManager;
        let plain = PropertyDescriptor::builder()
            .name("Count")
            .property_type(builtin::int64())
            .build();
        let overridden = PropertyDescriptor::builder()
            .name("Count")
            .property_type(builtin::int64())
            .value_serializer(Arc::new(TextSerializer))
            .build();

        let serializer = manager.value_serializer_for_property(&plain).unwrap();
        assert!(serializer.can_convert_to_string(&Value::Int(1)));

        let serializer = manager.value_serializer_for_property(&overridden).unwrap();
        assert!(!serializer.can_convert_to_string(&Value::Int(1)));
    }

    #[test]
    fn test_should_have_no_serializer_for_object() {
        assert!(
            DefaultSerializationManager
                .value_serializer_for(&builtin::object())
                .is_none()
        );
    }
}
