//! Serialization view of one node of the object graph.

use std::collections::HashSet;

use markwright_model::{
    MarkupInstance, ObjectRef, PropertyDescriptor, SerializationVisibility, TypeRef, Value,
    builtin,
};
use tracing::debug;

use crate::context::MarkupContext;
use crate::property::MarkupProperty;

/// One node of the graph being written: an instance, its nominal type, and
/// the dictionary key it is stored under, if any.
///
/// The instance is shared with the caller and never modified. Properties are
/// recomputed on every call, so changes to the instance between calls are
/// visible.
#[derive(Debug, Clone)]
pub struct MarkupObject {
    instance: Value,
    object_type: TypeRef,
    key: Option<Value>,
    context: MarkupContext,
}

impl MarkupObject {
    pub(crate) fn new(instance: Value, context: MarkupContext) -> Self {
        let object_type = instance
            .runtime_type()
            .unwrap_or_else(builtin::null_extension);
        Self {
            instance,
            object_type,
            key: None,
            context,
        }
    }

    pub(crate) fn with_key(mut self, key: Value) -> Self {
        self.key = Some(key);
        self
    }

    /// The described instance.
    #[must_use]
    pub fn instance(&self) -> &Value {
        &self.instance
    }

    /// The type used for the element tag. Null instances report
    /// `NullExtension`.
    #[must_use]
    pub fn object_type(&self) -> &TypeRef {
        &self.object_type
    }

    /// The dictionary key this object is stored under.
    #[must_use]
    pub fn key(&self) -> Option<&Value> {
        self.key.as_ref()
    }

    /// Whether the instance is a bare string with no key.
    pub(crate) fn is_plain_string(&self) -> bool {
        self.instance.is_string() && self.key.is_none()
    }

    /// Serializable properties, without constructor argument mapping.
    #[must_use]
    pub fn properties(&self) -> Vec<MarkupProperty> {
        self.get_properties(false)
    }

    /// Serializable properties in emission precedence order.
    ///
    /// A string-convertible instance yields only its string value (and key).
    /// Otherwise constructor arguments come first when
    /// `map_to_constructor_args` is set and the instance is a markup
    /// extension, then reflected properties, then the entries or items of a
    /// collection, and the key last.
    #[must_use]
    pub fn get_properties(&self, map_to_constructor_args: bool) -> Vec<MarkupProperty> {
        let mut properties = Vec::new();

        if let Some(serializer) = self.context.value_serializer_for(&self.object_type) {
            if serializer.can_convert_to_string(&self.instance) {
                properties.push(MarkupProperty::string_form(
                    self.instance.clone(),
                    self.object_type.clone(),
                    serializer,
                    self.context.clone(),
                ));
                self.push_key(&mut properties);
                return properties;
            }
        }

        if let Some(object) = self.instance.as_object() {
            let mut covered = HashSet::new();
            if map_to_constructor_args && self.object_type.is_markup_extension {
                self.push_constructor_arguments(object, &mut properties, &mut covered);
            }

            for descriptor in object.properties() {
                let value = object.value(&descriptor);
                if self.should_write(object.as_ref(), &descriptor, &value, &covered) {
                    properties.push(MarkupProperty::reflected(
                        descriptor,
                        value,
                        self.object_type.clone(),
                        self.context.clone(),
                    ));
                }
            }

            if object.entries().is_some() {
                properties.push(MarkupProperty::entries(
                    self.instance.clone(),
                    self.context.clone(),
                ));
            } else if object.items().is_some_and(|items| !items.is_empty()) {
                properties.push(MarkupProperty::collection_items(
                    self.instance.clone(),
                    self.context.clone(),
                ));
            }
        }

        self.push_key(&mut properties);
        properties
    }

    fn push_key(&self, properties: &mut Vec<MarkupProperty>) {
        if let Some(key) = &self.key {
            properties.push(MarkupProperty::key(key.clone(), self.context.clone()));
        }
    }

    fn push_constructor_arguments(
        &self,
        object: &ObjectRef,
        properties: &mut Vec<MarkupProperty>,
        covered: &mut HashSet<String>,
    ) {
        let Some(converter) = &self.object_type.instance_converter else {
            return;
        };
        match converter.to_instance_descriptor(object.as_ref()) {
            Ok(Some(descriptor)) => {
                for argument in descriptor.arguments {
                    covered.insert(argument.name.clone());
                    properties.push(MarkupProperty::constructor_argument(
                        argument,
                        self.context.clone(),
                    ));
                }
            }
            Ok(None) => {}
            Err(err) => {
                debug!(
                    type_name = %self.object_type.full_name(),
                    error = %err,
                    "instance converter unavailable, using properties"
                );
            }
        }
    }

    fn should_write(
        &self,
        instance: &dyn MarkupInstance,
        descriptor: &PropertyDescriptor,
        value: &Value,
        covered: &HashSet<String>,
    ) -> bool {
        let is_content = descriptor.visibility == SerializationVisibility::Content;
        if descriptor.visibility == SerializationVisibility::Hidden {
            return false;
        }
        if descriptor.read_only && !is_content {
            return false;
        }
        if is_content && value.is_empty_collection() {
            return false;
        }
        if descriptor
            .constructor_argument
            .as_ref()
            .is_some_and(|argument| covered.contains(argument))
        {
            return false;
        }

        let owner = descriptor
            .attached_owner
            .as_ref()
            .or(descriptor.declaring_type.as_ref())
            .unwrap_or(&self.object_type);
        match self.context.should_serialize(owner, &descriptor.name) {
            Some(predicate) => predicate.check(instance),
            None => {
                let default = descriptor.default_value.clone().unwrap_or_default();
                *value != default
            }
        }
    }
}
