//! Builtin types every object graph can reference.
//!
//! Primitive values ([`Value::Bool`](crate::Value::Bool) and friends) report
//! these as their runtime types. `NullExtension` is the type written for a
//! null value (`<x:Null />`).

use std::sync::{Arc, LazyLock};

use markwright_core::{XAML_NAMESPACE, XAML_PREFIX};

use crate::serializer::{PrimitiveSerializer, TextSerializer, ValueSerializer};
use crate::types::{ModuleInfo, ModuleRef, TypeInfo, TypeKind, TypeRef, TypeVisibility};

const SYSTEM_NAMESPACE: &str = "System";
const MARKUP_NAMESPACE: &str = "System.Windows.Markup";

static CORE_MODULE: LazyLock<ModuleRef> = LazyLock::new(|| ModuleInfo::new("mscorlib").into_ref());

static MARKUP_MODULE: LazyLock<ModuleRef> = LazyLock::new(|| {
    ModuleInfo::new("System.Xaml")
        .with_definition(XAML_NAMESPACE, MARKUP_NAMESPACE)
        .with_prefix(XAML_NAMESPACE, XAML_PREFIX)
        .into_ref()
});

static OBJECT: LazyLock<TypeRef> = LazyLock::new(|| system_type("Object", None));

static STRING: LazyLock<TypeRef> =
    LazyLock::new(|| system_type("String", Some(Arc::new(TextSerializer))));

static INT64: LazyLock<TypeRef> =
    LazyLock::new(|| system_type("Int64", Some(Arc::new(PrimitiveSerializer))));
static DOUBLE: LazyLock<TypeRef> =
    LazyLock::new(|| system_type("Double", Some(Arc::new(PrimitiveSerializer))));
static BOOLEAN: LazyLock<TypeRef> =
    LazyLock::new(|| system_type("Boolean", Some(Arc::new(PrimitiveSerializer))));

static NULL_EXTENSION: LazyLock<TypeRef> = LazyLock::new(|| {
    TypeInfo::builder()
        .name("NullExtension")
        .namespace(MARKUP_NAMESPACE)
        .module(MARKUP_MODULE.clone())
        .is_markup_extension(true)
        .build()
        .into_ref()
});

fn system_type(name: &str, value_serializer: Option<Arc<dyn ValueSerializer>>) -> TypeRef {
    TypeInfo {
        name: name.to_owned(),
        namespace: SYSTEM_NAMESPACE.to_owned(),
        module: CORE_MODULE.clone(),
        visibility: TypeVisibility::Public,
        is_generic: false,
        base: None,
        kind: TypeKind::Object,
        content_property: None,
        content_wrappers: Vec::new(),
        is_markup_extension: false,
        trim_surrounding_whitespace: false,
        has_default_constructor: true,
        value_serializer,
        instance_converter: None,
        should_serialize: Vec::new(),
    }
    .into_ref()
}

/// The module builtin primitives live in.
#[must_use]
pub fn core_module() -> ModuleRef {
    CORE_MODULE.clone()
}

/// The module publishing the markup language namespace.
#[must_use]
pub fn markup_module() -> ModuleRef {
    MARKUP_MODULE.clone()
}

/// `System.Object`.
#[must_use]
pub fn object() -> TypeRef {
    OBJECT.clone()
}

/// `System.String`.
#[must_use]
pub fn string() -> TypeRef {
    STRING.clone()
}

/// `System.Int64`, the runtime type of integer values.
#[must_use]
pub fn int64() -> TypeRef {
    INT64.clone()
}

/// `System.Double`, the runtime type of floating point values.
#[must_use]
pub fn double() -> TypeRef {
    DOUBLE.clone()
}

/// `System.Boolean`.
#[must_use]
pub fn boolean() -> TypeRef {
    BOOLEAN.clone()
}

/// The markup extension written in place of a null value.
#[must_use]
pub fn null_extension() -> TypeRef {
    NULL_EXTENSION.clone()
}
