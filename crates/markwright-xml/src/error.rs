//! Markup writer error types.

use std::io;
use std::string::FromUtf8Error;

use markwright_core::CoreError;
use markwright_model::ConvertError;

/// Errors raised while writing markup.
///
/// Every error aborts the whole write; output already handed to the sink is
/// left as is.
#[derive(Debug, thiserror::Error)]
pub enum MarkupError {
    /// An I/O error from the output sink.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The produced document was not valid UTF-8.
    #[error("markup is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),

    /// Invalid configuration.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A required argument was absent.
    #[error("argument must not be null: {0}")]
    NullArgument(&'static str),

    /// The object graph needs a markup form this writer cannot produce.
    #[error("unsupported markup feature: {0}")]
    Unsupported(UnsupportedFeature),

    /// A type cannot be named from markup.
    #[error("type {type_name} cannot be serialized: {reason}")]
    IneligibleType {
        /// Full name of the offending type.
        type_name: String,
        /// Why it cannot be addressed.
        reason: Ineligibility,
    },

    /// A value serializer failed.
    #[error(transparent)]
    Conversion(#[from] ConvertError),
}

/// Markup forms the writer does not implement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnsupportedFeature {
    /// A constructor-argument pseudo-property reached emission.
    #[error("constructor argument '{argument}' of {type_name}")]
    ConstructorArgument {
        /// Full name of the instance type.
        type_name: String,
        /// Constructor parameter name.
        argument: String,
    },

    /// A dictionary key that needs an element (`<x:Key>`) form.
    #[error("complex dictionary key of type {type_name}")]
    ComplexKey {
        /// Full name of the key type.
        type_name: String,
    },
}

/// Why a type is not addressable from markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Ineligibility {
    /// Not visible outside its module.
    #[error("type is not public")]
    NonPublic,
    /// Nested inside another type.
    #[error("type is nested")]
    NestedPublic,
    /// Has type parameters.
    #[error("type is generic")]
    Generic,
    /// Its name is not an NCName.
    #[error("type name is not a valid XML name")]
    InvalidName,
}
