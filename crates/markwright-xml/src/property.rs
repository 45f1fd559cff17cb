//! Serialization view of one property, value, or pseudo-property.

use std::cell::OnceCell;
use std::sync::Arc;

use markwright_model::{
    ConstructorArgument, PropertyDescriptor, TypeInfo, TypeRef, Value, ValueSerializer, builtin,
};

use crate::context::MarkupContext;
use crate::error::MarkupError;
use crate::object::MarkupObject;

const KEY_NAME: &str = "$Key";
const ITEMS_NAME: &str = "$Items";
const ENTRIES_NAME: &str = "$Entries";
const VALUE_NAME: &str = "$Value";

/// What a [`MarkupProperty`] stands for, which decides where it is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyRole {
    /// A reflected property with a string form; an attribute or text.
    Simple,
    /// A reflected property written as a property element or child content.
    Composite,
    /// The `x:Key` of a dictionary entry.
    Key,
    /// A constructor parameter of a markup extension.
    ConstructorArgument,
    /// The items of a sequence.
    Items,
    /// The entries of a dictionary.
    Entries,
    /// The string form of a string-convertible instance.
    StringValue,
}

#[derive(Debug, Clone)]
enum Kind {
    Reflected {
        descriptor: PropertyDescriptor,
        value: Value,
        owner_type: TypeRef,
    },
    Key {
        value: Value,
    },
    ConstructorArgument {
        argument: ConstructorArgument,
    },
    Items {
        collection: Value,
    },
    Entries {
        dictionary: Value,
    },
    StringValue {
        value: Value,
        value_type: TypeRef,
        serializer: Arc<dyn ValueSerializer>,
    },
}

/// One emittable property of a [`MarkupObject`].
#[derive(Debug, Clone)]
pub struct MarkupProperty {
    kind: Kind,
    context: MarkupContext,
    composite: OnceCell<bool>,
}

impl MarkupProperty {
    fn with_kind(kind: Kind, context: MarkupContext) -> Self {
        Self {
            kind,
            context,
            composite: OnceCell::new(),
        }
    }

    pub(crate) fn reflected(
        descriptor: PropertyDescriptor,
        value: Value,
        owner_type: TypeRef,
        context: MarkupContext,
    ) -> Self {
        Self::with_kind(
            Kind::Reflected {
                descriptor,
                value,
                owner_type,
            },
            context,
        )
    }

    pub(crate) fn key(value: Value, context: MarkupContext) -> Self {
        Self::with_kind(Kind::Key { value }, context)
    }

    pub(crate) fn constructor_argument(argument: ConstructorArgument, context: MarkupContext) -> Self {
        Self::with_kind(Kind::ConstructorArgument { argument }, context)
    }

    pub(crate) fn collection_items(collection: Value, context: MarkupContext) -> Self {
        Self::with_kind(Kind::Items { collection }, context)
    }

    pub(crate) fn entries(dictionary: Value, context: MarkupContext) -> Self {
        Self::with_kind(Kind::Entries { dictionary }, context)
    }

    pub(crate) fn string_form(
        value: Value,
        value_type: TypeRef,
        serializer: Arc<dyn ValueSerializer>,
        context: MarkupContext,
    ) -> Self {
        Self::with_kind(
            Kind::StringValue {
                value,
                value_type,
                serializer,
            },
            context,
        )
    }

    /// Member name; pseudo-properties use `$`-prefixed names.
    #[must_use]
    pub fn name(&self) -> &str {
        match &self.kind {
            Kind::Reflected { descriptor, .. } => &descriptor.name,
            Kind::Key { .. } => KEY_NAME,
            Kind::ConstructorArgument { argument } => &argument.name,
            Kind::Items { .. } => ITEMS_NAME,
            Kind::Entries { .. } => ENTRIES_NAME,
            Kind::StringValue { .. } => VALUE_NAME,
        }
    }

    /// The property value. Items and entries report their collection.
    #[must_use]
    pub fn value(&self) -> &Value {
        match &self.kind {
            Kind::Reflected { value, .. } | Kind::Key { value } | Kind::StringValue { value, .. } => {
                value
            }
            Kind::ConstructorArgument { argument } => &argument.value,
            Kind::Items { collection } => collection,
            Kind::Entries { dictionary } => dictionary,
        }
    }

    /// Declared type of the property.
    #[must_use]
    pub fn property_type(&self) -> TypeRef {
        match &self.kind {
            Kind::Reflected { descriptor, .. } => descriptor.property_type.clone(),
            Kind::ConstructorArgument { argument } => argument.parameter_type.clone(),
            Kind::StringValue { value_type, .. } => value_type.clone(),
            Kind::Key { value } | Kind::Items { collection: value } | Kind::Entries { dictionary: value } => {
                value.runtime_type().unwrap_or_else(builtin::object)
            }
        }
    }

    /// The reflective descriptor, for reflected properties.
    #[must_use]
    pub fn descriptor(&self) -> Option<&PropertyDescriptor> {
        match &self.kind {
            Kind::Reflected { descriptor, .. } => Some(descriptor),
            _ => None,
        }
    }

    /// Placement role.
    #[must_use]
    pub fn role(&self) -> PropertyRole {
        match &self.kind {
            Kind::Reflected { .. } if self.is_composite() => PropertyRole::Composite,
            Kind::Reflected { .. } => PropertyRole::Simple,
            Kind::Key { .. } => PropertyRole::Key,
            Kind::ConstructorArgument { .. } => PropertyRole::ConstructorArgument,
            Kind::Items { .. } => PropertyRole::Items,
            Kind::Entries { .. } => PropertyRole::Entries,
            Kind::StringValue { .. } => PropertyRole::StringValue,
        }
    }

    /// Whether this is a dictionary key.
    #[must_use]
    pub fn is_key(&self) -> bool {
        matches!(self.kind, Kind::Key { .. })
    }

    /// Whether this is a constructor argument.
    #[must_use]
    pub fn is_constructor_argument(&self) -> bool {
        matches!(self.kind, Kind::ConstructorArgument { .. })
    }

    /// Whether this is the object's content: its items, entries, string
    /// value, or the property its type names as content property.
    #[must_use]
    pub fn is_content(&self) -> bool {
        match &self.kind {
            Kind::Items { .. } | Kind::Entries { .. } | Kind::StringValue { .. } => true,
            Kind::Reflected {
                descriptor,
                owner_type,
                ..
            } => owner_type.content_property_name() == Some(descriptor.name.as_str()),
            Kind::Key { .. } | Kind::ConstructorArgument { .. } => false,
        }
    }

    /// Whether this is an attached property of a foreign owner type.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        match &self.kind {
            Kind::Reflected {
                descriptor,
                owner_type,
                ..
            } => descriptor.is_attached_to(owner_type),
            _ => false,
        }
    }

    pub(crate) fn context(&self) -> &MarkupContext {
        &self.context
    }

    /// Type qualifying the property element or attached attribute name.
    pub(crate) fn owner_type(&self) -> Option<&TypeRef> {
        match &self.kind {
            Kind::Reflected {
                descriptor,
                owner_type,
                ..
            } => Some(
                descriptor
                    .attached_owner
                    .as_ref()
                    .filter(|_| self.is_attached())
                    .unwrap_or(owner_type),
            ),
            _ => None,
        }
    }

    /// Property names that must be written before this one.
    #[must_use]
    pub fn depends_on(&self) -> &[String] {
        self.descriptor()
            .map_or(&[], |descriptor| descriptor.depends_on.as_slice())
    }

    /// Whether the value is written as nested objects rather than a string.
    ///
    /// Null is composite, a string stored where a string may go is not, a
    /// markup extension is composite unless the property forces attribute
    /// form, and anything else is composite unless a value serializer can
    /// convert it. Evaluated once.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        *self.composite.get_or_init(|| match &self.kind {
            Kind::Items { .. } | Kind::Entries { .. } => true,
            Kind::StringValue { .. } => false,
            _ => self.evaluate_composite(),
        })
    }

    fn evaluate_composite(&self) -> bool {
        let value = self.value();
        if value.is_null() {
            return true;
        }
        if value.is_string() && self.property_type().is_assignable_from(&builtin::string()) {
            return false;
        }
        let as_attribute = self
            .descriptor()
            .is_some_and(|descriptor| descriptor.serialize_as_attribute);
        if value.is_markup_extension() && !as_attribute {
            return true;
        }
        self.serializer()
            .is_none_or(|serializer| !serializer.can_convert_to_string(value))
    }

    /// The serializer for this property's value: the property's own, else
    /// the one registered for the value's runtime type.
    fn serializer(&self) -> Option<Arc<dyn ValueSerializer>> {
        if let Kind::StringValue { serializer, .. } = &self.kind {
            return Some(serializer.clone());
        }
        let declared = self
            .descriptor()
            .and_then(|descriptor| self.context.value_serializer_for_property(descriptor))
            .filter(|serializer| serializer.can_convert_to_string(self.value()));
        declared.or_else(|| {
            self.value()
                .runtime_type()
                .and_then(|ty| self.context.value_serializer_for(&ty))
        })
    }

    /// The string form of a non-composite value.
    pub fn string_value(&self) -> Result<String, MarkupError> {
        match self.serializer() {
            Some(serializer) => Ok(serializer.convert_to_string(self.value())?),
            None => Ok(self.value().text()),
        }
    }

    /// Types the string form refers to by prefix.
    #[must_use]
    pub fn type_references(&self) -> Vec<TypeRef> {
        self.serializer()
            .map(|serializer| serializer.type_references(self.value()))
            .unwrap_or_default()
    }

    /// Child objects of a composite property.
    ///
    /// Dictionary entries are ordered by the display text of their keys. A
    /// collection stored in a property of exactly its own type is elided and
    /// its items are returned directly (see
    /// [`elides_collection`](Self::elides_collection)).
    #[must_use]
    pub fn items(&self) -> Vec<MarkupObject> {
        match &self.kind {
            Kind::StringValue { .. } => Vec::new(),
            Kind::Items { collection } => collection
                .items()
                .unwrap_or_default()
                .into_iter()
                .map(|item| MarkupObject::new(item, self.context.clone()))
                .collect(),
            Kind::Entries { dictionary } => {
                let mut entries = dictionary.entries().unwrap_or_default();
                entries.sort_by_cached_key(|(key, _)| key.text());
                entries
                    .into_iter()
                    .map(|(key, value)| MarkupObject::new(value, self.context.clone()).with_key(key))
                    .collect()
            }
            Kind::Reflected { .. } if self.elides_collection() => {
                MarkupObject::new(self.value().clone(), self.context.clone())
                    .properties()
                    .iter()
                    .flat_map(MarkupProperty::items)
                    .collect()
            }
            _ => vec![MarkupObject::new(self.value().clone(), self.context.clone())],
        }
    }

    /// Whether the value is written as its items without an element of its
    /// own.
    ///
    /// Holds when the value's runtime type is exactly the declared type, the
    /// property is read-only or the type is implicitly constructible, the
    /// value is a sequence or dictionary, and it has nothing to write besides
    /// its items or entries.
    #[must_use]
    pub fn elides_collection(&self) -> bool {
        let Kind::Reflected { descriptor, value, .. } = &self.kind else {
            return false;
        };
        let Some(object) = value.as_object() else {
            return false;
        };
        let value_type = object.type_info();
        if !value_type.same_type(&descriptor.property_type) {
            return false;
        }
        if !descriptor.read_only && !value_type.has_default_constructor {
            return false;
        }
        if object.items().is_none() && object.entries().is_none() {
            return false;
        }
        MarkupObject::new(value.clone(), self.context.clone())
            .properties()
            .iter()
            .all(|p| matches!(p.role(), PropertyRole::Items | PropertyRole::Entries))
    }

    /// Whether `ty` accepts this property's value type.
    pub(crate) fn accepts(&self, ty: &TypeInfo) -> bool {
        self.property_type().is_assignable_from(ty)
    }
}
