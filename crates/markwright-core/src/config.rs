//! Writer configuration.
//!
//! Provides [`MarkupConfig`], the knobs that shape the emitted document. The
//! configuration is plain data: hosts build it in code or load it from their
//! own settings files through serde.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::{CoreError, CoreResult};

/// Markup writer configuration.
///
/// # Examples
///
/// ```
/// use markwright_core::MarkupConfig;
///
/// let config = MarkupConfig::builder().indent(true).build();
/// assert_eq!(config.indent_chars, "  ");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkupConfig {
    /// Whether nested elements are placed on their own indented lines.
    #[builder(default = false)]
    pub indent: bool,

    /// Whitespace used for one level of indentation.
    #[builder(default = String::from("  "), setter(into))]
    pub indent_chars: String,

    /// Whether an `<?xml ...?>` declaration precedes the root element.
    #[builder(default = false)]
    pub xml_declaration: bool,

    /// Whether markup extensions are mapped onto constructor arguments.
    ///
    /// Constructor-argument emission is not supported, so enabling this makes
    /// the writer fail on any markup extension that exposes an instance
    /// descriptor.
    #[builder(default = false)]
    pub map_constructor_arguments: bool,

    /// Whether the root type's namespace is bound to the empty prefix.
    #[builder(default = true)]
    pub root_default_namespace: bool,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            indent: false,
            indent_chars: String::from("  "),
            xml_declaration: false,
            map_constructor_arguments: false,
            root_default_namespace: true,
        }
    }
}

impl MarkupConfig {
    /// Configuration for human-readable output.
    #[must_use]
    pub fn indented() -> Self {
        Self {
            indent: true,
            ..Self::default()
        }
    }

    /// The indentation unit, or `None` when pretty printing is off.
    #[must_use]
    pub fn indentation(&self) -> Option<&str> {
        self.indent.then_some(self.indent_chars.as_str())
    }

    /// Check that the configuration can produce a well-formed document.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] if `indent_chars` contains anything other
    /// than XML whitespace.
    pub fn validate(&self) -> CoreResult<()> {
        if !self
            .indent_chars
            .chars()
            .all(|c| matches!(c, ' ' | '\t' | '\n' | '\r'))
        {
            return Err(CoreError::Config(format!(
                "indent_chars must be whitespace, got {:?}",
                self.indent_chars
            )));
        }
        Ok(())
    }
}
