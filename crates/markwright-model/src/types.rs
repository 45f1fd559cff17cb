//! Nominal type and module metadata.
//!
//! A [`TypeInfo`] plays the role runtime reflection plays in other markup
//! serializers: it names a type, places it in a module (which decides its XML
//! namespace), and carries the markup capabilities the writer consults, such
//! as the content property, whitespace trimming, and value serialization.

use std::fmt;
use std::sync::Arc;

use markwright_core::{TypeKey, TypeName, XmlNamespace};
use typed_builder::TypedBuilder;

use crate::builtin;
use crate::property::ShouldSerialize;
use crate::serializer::{InstanceConverter, ValueSerializer};

/// Shared handle to a [`TypeInfo`].
pub type TypeRef = Arc<TypeInfo>;

/// Shared handle to a [`ModuleInfo`].
pub type ModuleRef = Arc<ModuleInfo>;

/// A unit of type distribution (assembly, crate, package) and the XML
/// namespace declarations it makes for its code namespaces.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModuleInfo {
    name: String,
    /// `(xml namespace uri, code namespace)` pairs, in declaration order.
    xmlns_definitions: Vec<(String, String)>,
    /// `(xml namespace uri, prefix)` pairs, in declaration order.
    xmlns_prefixes: Vec<(String, String)>,
}

impl ModuleInfo {
    /// Create a module with no namespace declarations.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Declare that `code_namespace` is published under `uri`.
    #[must_use]
    pub fn with_definition(mut self, uri: impl Into<String>, code_namespace: impl Into<String>) -> Self {
        self.xmlns_definitions
            .push((uri.into(), code_namespace.into()));
        self
    }

    /// Declare `prefix` as the recommended prefix for `uri`.
    #[must_use]
    pub fn with_prefix(mut self, uri: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.xmlns_prefixes.push((uri.into(), prefix.into()));
        self
    }

    /// Wrap into a shared handle.
    #[must_use]
    pub fn into_ref(self) -> ModuleRef {
        Arc::new(self)
    }

    /// The module name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The first prefix this module declares for `uri`.
    #[must_use]
    pub fn prefix_for(&self, uri: &str) -> Option<&str> {
        self.xmlns_prefixes
            .iter()
            .find(|(u, _)| u == uri)
            .map(|(_, prefix)| prefix.as_str())
    }

    /// The XML namespace that types in `code_namespace` belong to.
    ///
    /// The first definition mapping the code namespace wins; unmapped code
    /// namespaces get a synthesized `clr-namespace:` uri.
    #[must_use]
    pub fn namespace_for(&self, code_namespace: &str) -> XmlNamespace {
        let uri = self
            .xmlns_definitions
            .iter()
            .find(|(_, ns)| ns == code_namespace)
            .map_or_else(
                || XmlNamespace::clr(code_namespace, &self.name).uri().to_owned(),
                |(uri, _)| uri.clone(),
            );
        match self.prefix_for(&uri) {
            Some(prefix) => XmlNamespace::with_prefix(uri.clone(), prefix),
            None => XmlNamespace::new(uri),
        }
    }
}

/// Accessibility of a type, as far as markup addressing cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeVisibility {
    /// Addressable from markup.
    #[default]
    Public,
    /// Public but nested inside another type; markup cannot name it.
    NestedPublic,
    /// Not visible outside its module.
    NonPublic,
}

/// Declared-type capability used when reasoning about property types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeKind {
    /// An ordinary object.
    #[default]
    Object,
    /// A sequence of items.
    Collection,
    /// A keyed collection of entries.
    Dictionary,
}

/// Metadata describing a nominal type.
#[derive(Clone, TypedBuilder)]
pub struct TypeInfo {
    /// Simple name; becomes the element's local name.
    #[builder(setter(into))]
    pub name: String,

    /// Code namespace, used to resolve the XML namespace.
    #[builder(default, setter(into))]
    pub namespace: String,

    /// Owning module.
    pub module: ModuleRef,

    /// Accessibility.
    #[builder(default)]
    pub visibility: TypeVisibility,

    /// Whether the type is a generic instantiation.
    #[builder(default)]
    pub is_generic: bool,

    /// Base type, if any. Everything is implicitly assignable to `Object`.
    #[builder(default, setter(strip_option))]
    pub base: Option<TypeRef>,

    /// Collection or dictionary capability of the type itself.
    #[builder(default)]
    pub kind: TypeKind,

    /// Name of the property whose value is written as element content.
    #[builder(default, setter(into, strip_option))]
    pub content_property: Option<String>,

    /// Types whose instances may stand in for bare text in this collection.
    #[builder(default)]
    pub content_wrappers: Vec<TypeRef>,

    /// Whether the type is a markup extension (`{x:Null}` and friends).
    #[builder(default)]
    pub is_markup_extension: bool,

    /// Whether whitespace next to instances of this type is dropped on load.
    #[builder(default)]
    pub trim_surrounding_whitespace: bool,

    /// Whether the type can be constructed implicitly by a markup loader.
    #[builder(default = true)]
    pub has_default_constructor: bool,

    /// Serializer turning whole instances into text.
    #[builder(default, setter(strip_option))]
    pub value_serializer: Option<Arc<dyn ValueSerializer>>,

    /// Converter producing constructor-based instance descriptors.
    #[builder(default, setter(strip_option))]
    pub instance_converter: Option<Arc<dyn InstanceConverter>>,

    /// Per-property should-serialize predicates declared by this type.
    #[builder(default)]
    pub should_serialize: Vec<(String, ShouldSerialize)>,
}

impl TypeInfo {
    /// Wrap into a shared handle.
    #[must_use]
    pub fn into_ref(self) -> TypeRef {
        Arc::new(self)
    }

    /// The nominal name.
    #[must_use]
    pub fn type_name(&self) -> TypeName {
        TypeName::new(self.namespace.clone(), self.name.clone())
    }

    /// Full identity, qualified by the defining module.
    #[must_use]
    pub fn type_key(&self) -> TypeKey {
        TypeKey::new(self.module.name(), self.type_name())
    }

    /// Dotted full name, e.g. `Demo.Button`.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.type_name().full_name()
    }

    /// Type identity: same module, namespace, and name.
    #[must_use]
    pub fn same_type(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
            || (self.name == other.name
                && self.namespace == other.namespace
                && self.module.name() == other.module.name())
    }

    /// Whether this is the builtin `System.Object`.
    #[must_use]
    pub fn is_object(&self) -> bool {
        self.same_type(&builtin::object())
    }

    /// Whether this is the builtin `System.String`.
    #[must_use]
    pub fn is_string(&self) -> bool {
        self.same_type(&builtin::string())
    }

    /// Whether a value of type `other` can be stored where `self` is declared.
    #[must_use]
    pub fn is_assignable_from(&self, other: &Self) -> bool {
        if self.is_object() {
            return true;
        }
        Self::ancestry(other).any(|ty| self.same_type(ty))
    }

    /// Whether the type is a sequence of items.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.kind == TypeKind::Collection
    }

    /// Whether the type is a keyed collection.
    #[must_use]
    pub fn is_dictionary(&self) -> bool {
        self.kind == TypeKind::Dictionary
    }

    /// The content property name, inherited through the base chain.
    #[must_use]
    pub fn content_property_name(&self) -> Option<&str> {
        Self::ancestry(self)
            .find_map(|ty| ty.content_property.as_deref())
    }

    /// Whether `wrapper` is registered as a content wrapper of this type.
    #[must_use]
    pub fn has_content_wrapper(&self, wrapper: &Self) -> bool {
        Self::ancestry(self)
            .flat_map(|ty| ty.content_wrappers.iter())
            .any(|w| w.same_type(wrapper))
    }

    /// The should-serialize predicate for `property`, searching base types.
    #[must_use]
    pub fn find_should_serialize(&self, property: &str) -> Option<ShouldSerialize> {
        Self::ancestry(self).find_map(|ty| {
            ty.should_serialize
                .iter()
                .find(|(name, _)| name == property)
                .map(|(_, predicate)| predicate.clone())
        })
    }

    /// The XML namespace this type's elements live in.
    #[must_use]
    pub fn xml_namespace(&self) -> XmlNamespace {
        self.module.namespace_for(&self.namespace)
    }

    fn ancestry(start: &Self) -> impl Iterator<Item = &Self> {
        std::iter::successors(Some(start), |ty| ty.base.as_deref())
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.full_name())
            .field("module", &self.module.name())
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
