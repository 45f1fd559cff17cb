//! End-to-end tests for the Markwright markup writer.
//!
//! The fixtures below model a small WPF-like element tree: panels holding
//! buttons, flow documents with inline runs, and resource dictionaries. Every
//! test checks its output for well-formedness and namespace closure by
//! reading it back with quick-xml's namespace-aware reader.

use std::sync::Once;

use markwright_core::MarkupConfig;
use markwright_model::{
    DynamicObject, ModuleInfo, ModuleRef, PropertyDescriptor, SerializationVisibility, TypeInfo,
    TypeKind, TypeRef, Value, builtin,
};
use markwright_xml::MarkupWriter;
use quick_xml::NsReader;
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;

/// The presentation namespace every fixture control lives in.
pub const PRESENTATION: &str = "http://schemas.microsoft.com/winfx/2006/xaml/presentation";

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Serialize with the default configuration and verify the result parses.
#[must_use]
pub fn write(value: &Value) -> String {
    write_with(MarkupConfig::default(), value)
}

/// Serialize with `config` and verify the result parses.
#[must_use]
pub fn write_with(config: MarkupConfig, value: &Value) -> String {
    init_tracing();
    let xml = MarkupWriter::new(config)
        .write_to_string(value)
        .expect("markup should be written");
    assert_namespace_closure(&xml);
    xml
}

/// Assert that `xml` is well formed and every prefix it uses is declared.
pub fn assert_namespace_closure(xml: &str) {
    let mut reader = NsReader::from_str(xml);
    loop {
        let (resolved, event) = reader
            .read_resolved_event()
            .unwrap_or_else(|e| panic!("malformed markup {xml}: {e}"));
        let unknown_element = matches!(resolved, ResolveResult::Unknown(_));
        match event {
            Event::Start(e) | Event::Empty(e) => {
                assert!(!unknown_element, "undeclared element prefix in {xml}");
                for attribute in e.attributes() {
                    let attribute = attribute.expect("attribute should parse");
                    let (resolved, _) = reader.resolve_attribute(attribute.key);
                    assert!(
                        !matches!(resolved, ResolveResult::Unknown(_)),
                        "undeclared attribute prefix in {xml}"
                    );
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Fixture type system
// ---------------------------------------------------------------------------

/// The module publishing the fixture controls.
#[must_use]
pub fn framework() -> ModuleRef {
    ModuleInfo::new("PresentationFramework")
        .with_definition(PRESENTATION, "System.Windows.Controls")
        .with_definition(PRESENTATION, "System.Windows.Documents")
        .into_ref()
}

fn control(name: &str) -> TypeInfo {
    framework_type(name, "System.Windows.Controls")
}

fn framework_type(name: &str, namespace: &str) -> TypeInfo {
    TypeInfo::builder()
        .name(name)
        .namespace(namespace)
        .module(framework())
        .build()
}

fn document_element(name: &str) -> TypeInfo {
    framework_type(name, "System.Windows.Documents")
}

/// `UIElementCollection`.
#[must_use]
pub fn element_collection() -> TypeRef {
    TypeInfo {
        kind: TypeKind::Collection,
        ..control("UIElementCollection")
    }
    .into_ref()
}

/// `InlineCollection`; `Run` children unwrap to text.
#[must_use]
pub fn inline_collection() -> TypeRef {
    TypeInfo {
        kind: TypeKind::Collection,
        content_wrappers: vec![run()],
        ..document_element("InlineCollection")
    }
    .into_ref()
}

/// `ResourceDictionary`.
#[must_use]
pub fn resource_dictionary() -> TypeRef {
    TypeInfo {
        kind: TypeKind::Dictionary,
        ..control("ResourceDictionary")
    }
    .into_ref()
}

/// `Button`, whose content is its `Content` property.
#[must_use]
pub fn button() -> TypeRef {
    TypeInfo {
        content_property: Some("Content".to_owned()),
        ..control("Button")
    }
    .into_ref()
}

/// `StackPanel`, whose content is its `Children`.
#[must_use]
pub fn stack_panel() -> TypeRef {
    TypeInfo {
        content_property: Some("Children".to_owned()),
        ..control("StackPanel")
    }
    .into_ref()
}

/// `Grid`, owner of the attached `Row` property.
#[must_use]
pub fn grid() -> TypeRef {
    TypeInfo {
        content_property: Some("Children".to_owned()),
        ..control("Grid")
    }
    .into_ref()
}

/// `TextBlock`, whose content is its `Text`.
#[must_use]
pub fn text_block() -> TypeRef {
    TypeInfo {
        content_property: Some("Text".to_owned()),
        ..control("TextBlock")
    }
    .into_ref()
}

/// `Paragraph`, a block that trims whitespace around itself.
#[must_use]
pub fn paragraph() -> TypeRef {
    TypeInfo {
        content_property: Some("Inlines".to_owned()),
        trim_surrounding_whitespace: true,
        ..document_element("Paragraph")
    }
    .into_ref()
}

/// `Bold`, an inline span.
#[must_use]
pub fn bold() -> TypeRef {
    TypeInfo {
        content_property: Some("Inlines".to_owned()),
        ..document_element("Bold")
    }
    .into_ref()
}

/// `Run`, a plain text inline.
#[must_use]
pub fn run() -> TypeRef {
    TypeInfo {
        content_property: Some("Text".to_owned()),
        ..document_element("Run")
    }
    .into_ref()
}

/// `LineBreak`, an inline that trims whitespace around itself.
#[must_use]
pub fn line_break() -> TypeRef {
    TypeInfo {
        trim_surrounding_whitespace: true,
        ..document_element("LineBreak")
    }
    .into_ref()
}

/// A read-only collection property serialized through its contents.
#[must_use]
pub fn contents_property(name: &str, property_type: TypeRef) -> PropertyDescriptor {
    PropertyDescriptor::builder()
        .name(name)
        .property_type(property_type)
        .read_only(true)
        .visibility(SerializationVisibility::Content)
        .build()
}

/// A plain settable property.
#[must_use]
pub fn property(name: &str, property_type: TypeRef) -> PropertyDescriptor {
    PropertyDescriptor::builder()
        .name(name)
        .property_type(property_type)
        .build()
}

/// `Grid.Row`.
#[must_use]
pub fn grid_row() -> PropertyDescriptor {
    PropertyDescriptor::builder()
        .name("Row")
        .property_type(builtin::int64())
        .attached_owner(grid())
        .default_value(Value::Int(0))
        .build()
}

// ---------------------------------------------------------------------------
// Fixture instances
// ---------------------------------------------------------------------------

/// A button with `content`.
#[must_use]
pub fn button_with(content: impl Into<Value>) -> DynamicObject {
    DynamicObject::new(button()).with(property("Content", builtin::object()), content)
}

fn collection_of(ty: TypeRef, items: Vec<Value>) -> Value {
    items
        .into_iter()
        .fold(DynamicObject::new(ty), |list, item| list.with_item(item))
        .into_value()
}

/// A stack panel holding `children`.
#[must_use]
pub fn stack_panel_of(children: Vec<Value>) -> DynamicObject {
    DynamicObject::new(stack_panel()).with(
        contents_property("Children", element_collection()),
        collection_of(element_collection(), children),
    )
}

/// A grid holding `children`.
#[must_use]
pub fn grid_of(children: Vec<Value>) -> DynamicObject {
    DynamicObject::new(grid()).with(
        contents_property("Children", element_collection()),
        collection_of(element_collection(), children),
    )
}

/// A paragraph holding `inlines`.
#[must_use]
pub fn paragraph_of(inlines: Vec<Value>) -> Value {
    DynamicObject::new(paragraph())
        .with(
            contents_property("Inlines", inline_collection()),
            collection_of(inline_collection(), inlines),
        )
        .into_value()
}

/// A bold span holding `inlines`.
#[must_use]
pub fn bold_of(inlines: Vec<Value>) -> Value {
    DynamicObject::new(bold())
        .with(
            contents_property("Inlines", inline_collection()),
            collection_of(inline_collection(), inlines),
        )
        .into_value()
}

/// A run of `text`.
#[must_use]
pub fn run_of(text: &str) -> Value {
    DynamicObject::new(run())
        .with(property("Text", builtin::string()), text)
        .into_value()
}

/// A text block showing `text`.
#[must_use]
pub fn text_block_of(text: &str) -> Value {
    DynamicObject::new(text_block())
        .with(property("Text", builtin::string()), text)
        .into_value()
}

/// A resource dictionary holding `entries`.
#[must_use]
pub fn resources_of(entries: Vec<(&str, Value)>) -> Value {
    entries
        .into_iter()
        .fold(DynamicObject::new(resource_dictionary()), |dictionary, (key, value)| {
            dictionary.with_entry(key, value)
        })
        .into_value()
}

mod test_content;
mod test_document;
mod test_resources;
