//! Core types, configuration, and caches for Markwright.
//!
//! This crate provides the foundational building blocks shared by the object
//! model and the markup writer: writer configuration, type and namespace
//! identity, XML name validation, and the concurrent per-member cache used to
//! memoize reflective lookups.

mod cache;
mod config;
mod error;
mod types;

pub use cache::MemberCache;
pub use config::MarkupConfig;
pub use error::{CoreError, CoreResult};
pub use types::{
    TypeKey, TypeName, XAML_NAMESPACE, XAML_PREFIX, XML_NAMESPACE, XmlNamespace, derive_prefix, is_ncname,
};
