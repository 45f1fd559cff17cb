//! The two-pass markup writer.

use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;

use markwright_core::{MarkupConfig, XmlNamespace, is_ncname};
use markwright_model::{
    DefaultSerializationManager, SerializationManager, TypeInfo, TypeVisibility, Value, builtin,
};
use tracing::{debug, trace};

use crate::context::MarkupContext;
use crate::error::{Ineligibility, MarkupError, UnsupportedFeature};
use crate::object::MarkupObject;
use crate::ordered::PartiallyOrderedList;
use crate::property::{MarkupProperty, PropertyRole};
use crate::scope::Scope;
use crate::sink::MarkupSink;
use crate::whitespace::{ContentRun, is_normalization_neutral, needs_preservation};

const EXTENSION_SUFFIX: &str = "Extension";

/// Describe `instance` for serialization with the default manager.
pub fn markup_object_for(instance: &Value) -> Result<MarkupObject, MarkupError> {
    markup_object_for_with_manager(
        instance,
        Some(Arc::new(DefaultSerializationManager)),
    )
}

/// Describe `instance` for serialization with `manager`.
///
/// Both arguments are required; a null instance or a missing manager is
/// rejected before anything else is looked at.
pub fn markup_object_for_with_manager(
    instance: &Value,
    manager: Option<Arc<dyn SerializationManager>>,
) -> Result<MarkupObject, MarkupError> {
    if instance.is_null() {
        return Err(MarkupError::NullArgument("instance"));
    }
    let manager = manager.ok_or(MarkupError::NullArgument("manager"))?;
    Ok(MarkupObject::new(instance.clone(), MarkupContext::new(manager)))
}

/// Serialize `instance` with the default configuration.
pub fn to_markup(instance: &Value) -> Result<String, MarkupError> {
    MarkupWriter::default().write_to_string(instance)
}

/// Writes object graphs as namespaced XML markup.
///
/// Writing runs in two passes over the graph. Pass one records every
/// namespace the document uses into the root scope, so all declarations land
/// on the root element. Pass two emits the document.
#[derive(Debug, Clone, Default)]
pub struct MarkupWriter {
    config: MarkupConfig,
    context: MarkupContext,
}

/// One piece of planned element content.
#[derive(Debug)]
enum ContentPart {
    Text(String),
    Element(MarkupObject),
}

impl MarkupWriter {
    /// Create a writer using the default serialization manager.
    #[must_use]
    pub fn new(config: MarkupConfig) -> Self {
        Self {
            config,
            context: MarkupContext::default(),
        }
    }

    /// Create a writer resolving serializers and namespaces through `manager`.
    #[must_use]
    pub fn with_manager(config: MarkupConfig, manager: Arc<dyn SerializationManager>) -> Self {
        Self {
            config,
            context: MarkupContext::new(manager),
        }
    }

    /// The writer configuration.
    #[must_use]
    pub fn config(&self) -> &MarkupConfig {
        &self.config
    }

    /// The session context shared by every object this writer describes.
    #[must_use]
    pub fn context(&self) -> &MarkupContext {
        &self.context
    }

    /// Serialize `instance` into `out`.
    ///
    /// On error, whatever was already written stays in `out`.
    pub fn write<W: Write>(&self, instance: &Value, out: W) -> Result<(), MarkupError> {
        self.config.validate()?;
        if instance.is_null() {
            return Err(MarkupError::NullArgument("instance"));
        }
        let root = MarkupObject::new(instance.clone(), self.context.clone());
        debug!(root_type = %root.object_type().full_name(), "writing markup document");

        let mut scope = Scope::new();
        if self.config.root_default_namespace {
            let namespace = self.context.xml_namespace_of(root.object_type());
            scope.bind(namespace.uri(), "");
        }
        self.record_namespaces(&mut scope, &root, true)?;
        debug!(
            namespaces = scope.local_bindings().count(),
            "recorded document namespaces"
        );

        let mut sink = MarkupSink::new(out, self.config.indentation());
        if self.config.xml_declaration {
            sink.declaration()?;
        }
        self.write_item(&mut sink, &root, &mut scope, true)?;
        sink.into_inner().flush()?;

        debug!(root_type = %root.object_type().full_name(), "finished markup document");
        Ok(())
    }

    /// Serialize `instance` to a string.
    pub fn write_to_string(&self, instance: &Value) -> Result<String, MarkupError> {
        let mut buf = Vec::with_capacity(512);
        self.write(instance, &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    // -----------------------------------------------------------------------
    // Pass 1: namespace discovery
    // -----------------------------------------------------------------------

    fn record_namespaces(
        &self,
        scope: &mut Scope<'_>,
        item: &MarkupObject,
        root: bool,
    ) -> Result<(), MarkupError> {
        let object_type = item.object_type();
        check_eligible(object_type)?;
        scope.make_addressable(&self.context.xml_namespace_of(object_type));

        let properties = item.get_properties(self.config.map_constructor_arguments);
        let content = select_content(item, &properties);
        for (index, property) in properties.iter().enumerate() {
            if property.is_key() {
                scope.make_addressable(&XmlNamespace::xaml());
            }
            if let Some(descriptor) = property.descriptor() {
                if descriptor.directive.is_some() {
                    scope.make_addressable(&XmlNamespace::xaml());
                }
                if property.is_attached() {
                    if let Some(owner) = property.owner_type() {
                        scope.make_addressable(&self.context.xml_namespace_of(owner));
                    }
                }
            }

            if !property.is_composite() {
                for ty in property.type_references() {
                    scope.make_addressable(&self.context.xml_namespace_of(&ty));
                }
                continue;
            }

            let items = property.items();
            if content == Some(index) {
                let split = root && splits_adjacent_strings(property);
                for part in self.plan_content(property, items, split)? {
                    if let ContentPart::Element(child) = part {
                        self.record_namespaces(scope, &child, false)?;
                    }
                }
            } else if let Some(wrapper) = explicit_wrapper(property, &items) {
                self.record_namespaces(scope, &wrapper, false)?;
            } else {
                for child in &items {
                    self.record_namespaces(scope, child, false)?;
                }
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Pass 2: emission
    // -----------------------------------------------------------------------

    fn write_item<W: Write>(
        &self,
        sink: &mut MarkupSink<W>,
        item: &MarkupObject,
        scope: &mut Scope<'_>,
        root: bool,
    ) -> Result<(), MarkupError> {
        let object_type = item.object_type();
        check_eligible(object_type)?;
        let tag = qualify(
            scope,
            &self.context.xml_namespace_of(object_type),
            &element_name(object_type),
        );

        let properties = item.get_properties(self.config.map_constructor_arguments);
        if let Some(argument) = properties.iter().find(|p| p.is_constructor_argument()) {
            return Err(MarkupError::Unsupported(UnsupportedFeature::ConstructorArgument {
                type_name: object_type.full_name(),
                argument: argument.name().to_owned(),
            }));
        }

        let content_index = select_content(item, &properties);
        let mut simple = Vec::new();
        let mut composite = Vec::new();
        for (index, property) in properties.iter().enumerate() {
            if content_index == Some(index) {
                continue;
            }
            if property.is_key() && property.is_composite() {
                return Err(MarkupError::Unsupported(UnsupportedFeature::ComplexKey {
                    type_name: property.property_type().full_name(),
                }));
            }
            if property.is_composite() {
                composite.push(property);
            } else {
                simple.push(property);
            }
        }

        let simple = order_by_dependencies(simple, &HashSet::new());
        let mut attributes = Vec::with_capacity(simple.len());
        for property in &simple {
            let name = self.attribute_name(scope, property);
            attributes.push((name, property.string_value()?));
        }
        let written: HashSet<String> = simple.iter().map(|p| p.name().to_owned()).collect();
        let composite = order_by_dependencies(composite, &written);

        let content = match content_index.and_then(|index| properties.get(index)) {
            Some(property) => Some(self.content_of(property, root)?),
            None => None,
        };
        let preserve = content
            .as_ref()
            .is_some_and(|content| !scope.preserves_whitespace() && content.needs_preservation());

        sink.start_element(&tag)?;
        for (name, value) in &attributes {
            sink.attribute(name, value)?;
        }
        if preserve {
            trace!(element = %tag, "preserving whitespace");
            sink.attribute("xml:space", "preserve")?;
        }
        declare_bindings(sink, scope)?;
        if preserve {
            scope.set_preserve_whitespace(true);
            sink.suppress_indentation();
        }

        for property in composite {
            self.write_property_element(sink, item, property, scope)?;
        }

        match content {
            Some(Content::Text(text)) => sink.text(&text)?,
            Some(Content::Mixed(parts)) => {
                if parts.iter().any(|part| matches!(part, ContentPart::Text(_))) {
                    sink.suppress_indentation();
                }
                for part in parts {
                    match part {
                        ContentPart::Text(text) => sink.text(&text)?,
                        ContentPart::Element(child) => {
                            let mut child_scope = scope.child();
                            self.write_item(sink, &child, &mut child_scope, false)?;
                        }
                    }
                }
            }
            None => {}
        }

        sink.end_element()?;
        Ok(())
    }

    fn write_property_element<W: Write>(
        &self,
        sink: &mut MarkupSink<W>,
        item: &MarkupObject,
        property: &MarkupProperty,
        scope: &Scope<'_>,
    ) -> Result<(), MarkupError> {
        let items = property.items();
        let wrapper = explicit_wrapper(property, &items);
        if wrapper.is_none() && items.is_empty() {
            trace!(property = property.name(), "skipping empty property element");
            return Ok(());
        }

        let owner = property.owner_type().unwrap_or(item.object_type());
        let mut property_scope = scope.child();
        let name = qualify(
            &mut property_scope,
            &self.context.xml_namespace_of(owner),
            &format!("{}.{}", element_name(owner), property.name()),
        );

        sink.start_element(&name)?;
        declare_bindings(sink, &property_scope)?;
        let children = match wrapper {
            Some(wrapper) => vec![wrapper],
            None => items,
        };
        for child in &children {
            let mut child_scope = property_scope.child();
            self.write_item(sink, child, &mut child_scope, false)?;
        }
        sink.end_element()?;
        Ok(())
    }

    fn attribute_name(&self, scope: &mut Scope<'_>, property: &MarkupProperty) -> String {
        if property.is_key() {
            return qualify(scope, &XmlNamespace::xaml(), "Key");
        }
        let Some(descriptor) = property.descriptor() else {
            return property.name().to_owned();
        };
        if descriptor.is_language {
            return "xml:lang".to_owned();
        }
        if let Some(directive) = &descriptor.directive {
            return qualify(scope, &XmlNamespace::xaml(), directive);
        }
        match property.owner_type().filter(|_| property.is_attached()) {
            Some(owner) => qualify(
                scope,
                &self.context.xml_namespace_of(owner),
                &format!("{}.{}", owner.name, descriptor.name),
            ),
            None => descriptor.name.clone(),
        }
    }

    fn content_of(&self, property: &MarkupProperty, root: bool) -> Result<Content, MarkupError> {
        if property.is_composite() {
            let split = root && splits_adjacent_strings(property);
            Ok(Content::Mixed(self.plan_content(property, property.items(), split)?))
        } else {
            Ok(Content::Text(property.string_value()?))
        }
    }

    /// Turn the children of a content property into text runs and elements.
    ///
    /// Consecutive strings become one text run. Children whose type is a
    /// content wrapper of the collection and that carry nothing but their
    /// own textual content are unwrapped into that text. With
    /// `split_strings`, a string directly after text is kept as its own
    /// element instead.
    fn plan_content(
        &self,
        property: &MarkupProperty,
        items: Vec<MarkupObject>,
        split_strings: bool,
    ) -> Result<Vec<ContentPart>, MarkupError> {
        let collection_type = property.value().runtime_type();
        let mut parts: Vec<ContentPart> = Vec::with_capacity(items.len());
        for child in items {
            let text = if child.is_plain_string() {
                Some(child.instance().text())
            } else if collection_type
                .as_ref()
                .is_some_and(|ty| ty.has_content_wrapper(child.object_type()))
            {
                unwrapped_text(&child)?
            } else {
                None
            };

            let follows_text = matches!(parts.last(), Some(ContentPart::Text(_)));
            match text {
                Some(_) if split_strings && follows_text && child.is_plain_string() => {
                    parts.push(ContentPart::Element(child));
                }
                Some(text) => {
                    if let Some(ContentPart::Text(last)) = parts.last_mut() {
                        last.push_str(&text);
                    } else {
                        parts.push(ContentPart::Text(text));
                    }
                }
                None => parts.push(ContentPart::Element(child)),
            }
        }
        Ok(parts)
    }
}

/// Planned content of one element.
#[derive(Debug)]
enum Content {
    Text(String),
    Mixed(Vec<ContentPart>),
}

impl Content {
    fn needs_preservation(&self) -> bool {
        match self {
            Self::Text(text) => !is_normalization_neutral(text, false, false),
            Self::Mixed(parts) => {
                let runs: Vec<ContentRun<'_>> = parts
                    .iter()
                    .map(|part| match part {
                        ContentPart::Text(text) => ContentRun::Text(text),
                        ContentPart::Element(child) => ContentRun::Element {
                            trims_surrounding_whitespace: child
                                .object_type()
                                .trim_surrounding_whitespace,
                        },
                    })
                    .collect();
                needs_preservation(&runs)
            }
        }
    }
}

/// The text of a content wrapper whose only property is its non-composite
/// content property.
fn unwrapped_text(child: &MarkupObject) -> Result<Option<String>, MarkupError> {
    let properties = child.properties();
    let [only] = properties.as_slice() else {
        return Ok(None);
    };
    let is_content = child.object_type().content_property_name() == Some(only.name());
    if only.descriptor().is_none() || !is_content || only.is_composite() {
        return Ok(None);
    }
    only.string_value().map(Some)
}

/// Whether adjacent strings in `property` must stay separate items.
///
/// Applies to the items of a collection written as the document root: the
/// loader reads one text node back as one item, so a string following text
/// gets an element of its own.
fn splits_adjacent_strings(property: &MarkupProperty) -> bool {
    property.role() == PropertyRole::Items
}

/// Pick the property written as element content.
///
/// Items, entries, and string values win. Otherwise the property the type
/// names as its content property qualifies unless it is attached, forced to
/// attribute form, a read-write collection, or a non-composite value that a
/// string could not stand for.
fn select_content(item: &MarkupObject, properties: &[MarkupProperty]) -> Option<usize> {
    if let Some(index) = properties
        .iter()
        .position(|p| p.is_content() && p.descriptor().is_none())
    {
        return Some(index);
    }

    let name = item.object_type().content_property_name()?;
    let index = properties
        .iter()
        .position(|p| p.descriptor().is_some() && p.name() == name)?;
    let property = &properties[index];
    let descriptor = property.descriptor()?;
    if property.is_attached() || descriptor.serialize_as_attribute {
        return None;
    }
    if property.is_composite() {
        let declared = &descriptor.property_type;
        if !descriptor.read_only && (declared.is_collection() || declared.is_dictionary()) {
            return None;
        }
    } else if property.value().is_markup_extension()
        || !descriptor
            .property_type
            .is_assignable_from(&builtin::string())
    {
        return None;
    }
    Some(index)
}

/// The whole collection value, when a property element must name it
/// explicitly instead of listing its items.
///
/// Needed for a settable collection property with a null default whose
/// value was elided, unless the first item is itself of the property type: a loader
/// finding the property unset must be told which collection to create.
fn explicit_wrapper(property: &MarkupProperty, items: &[MarkupObject]) -> Option<MarkupObject> {
    let descriptor = property.descriptor()?;
    let declared = &descriptor.property_type;
    if !(declared.is_collection() || declared.is_dictionary())
        || descriptor.read_only
        || !descriptor.has_null_default()
        || !property.elides_collection()
    {
        return None;
    }
    let needed = items
        .first()
        .is_none_or(|first| !property.accepts(first.object_type()));
    needed.then(|| MarkupObject::new(property.value().clone(), property.context().clone()))
}

/// Order properties so each follows the siblings it depends on.
///
/// Properties are taken in declaration order. One whose dependency is
/// present but not yet written is deferred; deferred properties are flushed
/// at the end in dependency order. Names in `already_written` count as
/// satisfied.
///
/// Only dependencies within `properties` are ordered. Attributes always
/// precede property elements, so an attribute depending on a property
/// element is written without waiting for it.
fn order_by_dependencies<'a>(
    properties: Vec<&'a MarkupProperty>,
    already_written: &HashSet<String>,
) -> Vec<&'a MarkupProperty> {
    let present: HashSet<&str> = properties.iter().map(|p| p.name()).collect();
    let mut written: HashSet<&str> = already_written.iter().map(String::as_str).collect();
    let mut ordered = Vec::with_capacity(properties.len());
    let mut deferred = PartiallyOrderedList::new();

    for property in properties {
        let pending: Vec<&str> = property
            .depends_on()
            .iter()
            .map(String::as_str)
            .filter(|dependency| present.contains(dependency) && !written.contains(dependency))
            .collect();
        if pending.is_empty() {
            written.insert(property.name());
            ordered.push(property);
            continue;
        }
        trace!(property = property.name(), ?pending, "deferring property");
        for dependency in pending {
            deferred.set_order(dependency.to_owned(), property.name().to_owned());
        }
        deferred.add(property.name().to_owned(), property);
    }

    for property in deferred.into_values() {
        if written.insert(property.name()) {
            ordered.push(property);
        }
    }
    ordered
}

/// Reject types markup cannot name.
fn check_eligible(ty: &TypeInfo) -> Result<(), MarkupError> {
    let reason = match ty.visibility {
        TypeVisibility::NonPublic => Some(Ineligibility::NonPublic),
        TypeVisibility::NestedPublic => Some(Ineligibility::NestedPublic),
        TypeVisibility::Public if ty.is_generic => Some(Ineligibility::Generic),
        TypeVisibility::Public if !is_ncname(&ty.name) => Some(Ineligibility::InvalidName),
        TypeVisibility::Public => None,
    };
    match reason {
        Some(reason) => Err(MarkupError::IneligibleType {
            type_name: ty.full_name(),
            reason,
        }),
        None => Ok(()),
    }
}

/// The local element name of a type. Markup extensions drop their
/// `Extension` suffix.
fn element_name(ty: &TypeInfo) -> String {
    if ty.is_markup_extension && ty.name.len() > EXTENSION_SUFFIX.len() {
        if let Some(short) = ty.name.strip_suffix(EXTENSION_SUFFIX) {
            return short.to_owned();
        }
    }
    ty.name.clone()
}

/// `prefix:local`, binding the namespace on `scope` if it is not yet
/// addressable.
fn qualify(scope: &mut Scope<'_>, namespace: &XmlNamespace, local: &str) -> String {
    scope.make_addressable(namespace);
    match scope.prefix_of(namespace.uri()) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{local}"),
        _ => local.to_owned(),
    }
}

/// Declare the bindings recorded on `scope` itself.
fn declare_bindings<W: Write>(sink: &mut MarkupSink<W>, scope: &Scope<'_>) -> Result<(), MarkupError> {
    for (uri, prefix) in scope.local_bindings() {
        if prefix.is_empty() {
            sink.attribute("xmlns", uri)?;
        } else {
            sink.attribute(&format!("xmlns:{prefix}"), uri)?;
        }
    }
    Ok(())
}
