//! Object model for Markwright.
//!
//! The writer never reflects over Rust types directly. Hosts describe their
//! object graph through the contracts in this crate instead:
//!
//! - [`TypeInfo`] and [`ModuleInfo`] describe nominal types, their markup
//!   capabilities, and the XML namespaces their modules declare
//! - [`PropertyDescriptor`] is the reflective metadata of one property
//! - [`MarkupInstance`] enumerates an object's properties, items, and entries
//! - [`ValueSerializer`] converts values to attribute or text form
//! - [`InstanceConverter`] maps markup extensions onto constructor arguments
//! - [`SerializationManager`] resolves the above per type and per property
//!
//! [`DynamicObject`] is a ready-made [`MarkupInstance`] for hosts whose
//! objects are data rather than code.

pub mod builtin;
pub mod dynamic;
pub mod manager;
pub mod property;
pub mod serializer;
pub mod types;
pub mod value;

pub use dynamic::DynamicObject;
pub use manager::{DefaultSerializationManager, SerializationManager};
pub use property::{PropertyDescriptor, SerializationVisibility, ShouldSerialize};
pub use serializer::{
    ConstructorArgument, ConvertError, ConverterError, InstanceConverter, InstanceDescriptor,
    PrimitiveSerializer, TextSerializer, ValueSerializer,
};
pub use types::{ModuleInfo, ModuleRef, TypeInfo, TypeKind, TypeRef, TypeVisibility};
pub use value::{MarkupInstance, ObjectRef, Value};
