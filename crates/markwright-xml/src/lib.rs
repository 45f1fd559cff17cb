//! Markup writer for Markwright object graphs.
//!
//! [`MarkupWriter`] walks a [`Value`](markwright_model::Value) graph in two
//! passes. The first pass records every XML namespace the document needs into
//! the root [`Scope`]; the second emits elements, attributes, and content
//! through a [`MarkupSink`], ordering dependent properties with a
//! [`PartiallyOrderedList`] and marking text runs that would not survive
//! whitespace normalization with `xml:space="preserve"`.
//!
//! ```
//! use markwright_model::{DynamicObject, ModuleInfo, PropertyDescriptor, TypeInfo, builtin};
//! use markwright_xml::to_markup;
//!
//! let module = ModuleInfo::new("demo").into_ref();
//! let label = TypeInfo::builder().name("Label").namespace("Demo").module(module).build();
//! let text = PropertyDescriptor::builder()
//!     .name("Text")
//!     .property_type(builtin::string())
//!     .build();
//! let value = DynamicObject::new(label.into_ref()).with(text, "hi").into_value();
//!
//! assert_eq!(
//!     to_markup(&value).unwrap(),
//!     r#"<Label Text="hi" xmlns="clr-namespace:Demo;assembly=demo"/>"#
//! );
//! ```

mod context;
mod error;
mod object;
mod ordered;
mod property;
mod scope;
mod sink;
mod whitespace;
mod writer;

pub use context::MarkupContext;
pub use error::{Ineligibility, MarkupError, UnsupportedFeature};
pub use object::MarkupObject;
pub use ordered::PartiallyOrderedList;
pub use property::{MarkupProperty, PropertyRole};
pub use scope::Scope;
pub use sink::MarkupSink;
pub use whitespace::is_normalization_neutral;
pub use writer::{MarkupWriter, markup_object_for, markup_object_for_with_manager, to_markup};
