//! Type and namespace identity shared across the object model and the writer.

use std::fmt;

/// The reserved structural namespace (`x:Key`, `x:Null`, directives).
pub const XAML_NAMESPACE: &str = "http://schemas.microsoft.com/winfx/2006/xaml";

/// Conventional prefix for [`XAML_NAMESPACE`].
pub const XAML_PREFIX: &str = "x";

/// The namespace implicitly bound to the `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Prefix used when nothing better can be derived from a namespace uri.
const FALLBACK_PREFIX: &str = "p";

/// Scheme of namespaces synthesized from a code namespace and module.
const CLR_NAMESPACE_SCHEME: &str = "clr-namespace:";

/// Nominal name of a type: its code namespace plus its simple name.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct TypeName {
    namespace: String,
    name: String,
}

impl TypeName {
    /// Create a type name.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// The code namespace (may be empty).
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The simple name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dotted full name, e.g. `System.String`.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.to_string()
    }
}

/// Full identity of a type: its [`TypeName`] qualified by the module that
/// defines it.
///
/// Two modules may each define `Demo.Widget`; their keys differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey {
    module: String,
    name: TypeName,
}

impl TypeKey {
    /// Create the key of `name` defined in `module`.
    #[must_use]
    pub fn new(module: impl Into<String>, name: TypeName) -> Self {
        Self {
            module: module.into(),
            name,
        }
    }

    /// Name of the defining module.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// The nominal type name.
    #[must_use]
    pub fn type_name(&self) -> &TypeName {
        &self.name
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

/// An XML namespace uri together with the prefix its owner prefers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct XmlNamespace {
    uri: String,
    preferred_prefix: Option<String>,
}

impl XmlNamespace {
    /// A namespace with no declared prefix.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            preferred_prefix: None,
        }
    }

    /// A namespace whose owner declares `prefix` for it.
    #[must_use]
    pub fn with_prefix(uri: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            preferred_prefix: Some(prefix.into()),
        }
    }

    /// The namespace synthesized for a code namespace that no module maps.
    ///
    /// # Examples
    ///
    /// ```
    /// use markwright_core::XmlNamespace;
    ///
    /// let ns = XmlNamespace::clr("System", "mscorlib");
    /// assert_eq!(ns.uri(), "clr-namespace:System;assembly=mscorlib");
    /// assert_eq!(ns.default_prefix(), "s");
    /// ```
    #[must_use]
    pub fn clr(namespace: &str, module: &str) -> Self {
        Self::new(format!("{CLR_NAMESPACE_SCHEME}{namespace};assembly={module}"))
    }

    /// The reserved structural namespace, bound to `x` by convention.
    #[must_use]
    pub fn xaml() -> Self {
        Self::with_prefix(XAML_NAMESPACE, XAML_PREFIX)
    }

    /// The namespace uri.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The prefix declared by the namespace's owner, if any.
    #[must_use]
    pub fn preferred_prefix(&self) -> Option<&str> {
        self.preferred_prefix.as_deref()
    }

    /// The prefix to try first when binding this namespace.
    #[must_use]
    pub fn default_prefix(&self) -> String {
        self.preferred_prefix
            .clone()
            .unwrap_or_else(|| derive_prefix(&self.uri))
    }
}

/// Derive a short prefix from a namespace uri.
///
/// `clr-namespace:` uris yield the lowercase initials of their dotted code
/// namespace; anything else falls back to `p`. Derived prefixes never start
/// with the reserved `xml` sequence.
///
/// # Examples
///
/// ```
/// use markwright_core::derive_prefix;
///
/// assert_eq!(derive_prefix("clr-namespace:Demo.Controls;assembly=demo"), "dc");
/// assert_eq!(derive_prefix("urn:widgets"), "p");
/// ```
#[must_use]
pub fn derive_prefix(uri: &str) -> String {
    let derived: String = uri
        .strip_prefix(CLR_NAMESPACE_SCHEME)
        .and_then(|rest| rest.split(';').next())
        .map(|namespace| {
            namespace
                .split('.')
                .filter_map(|segment| segment.chars().next())
                .filter(char::is_ascii_alphabetic)
                .map(|c| c.to_ascii_lowercase())
                .collect()
        })
        .unwrap_or_default();

    if derived.is_empty() || derived.starts_with("xml") {
        FALLBACK_PREFIX.to_owned()
    } else {
        derived
    }
}

/// Whether `name` is a valid XML NCName (a name without a colon).
#[must_use]
pub fn is_ncname(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
