//! Lexical namespace prefix frames.

use std::collections::HashMap;

use indexmap::IndexMap;
use markwright_core::{XML_NAMESPACE, XmlNamespace, derive_prefix};

const RESERVED_PREFIXES: [&str; 2] = ["xml", "xmlns"];

/// One frame of namespace bindings, chained to the frame of the enclosing
/// element.
///
/// Bindings are recorded on the frame they are made in and never removed, so
/// a prefix stays unique along the chain it was allocated on. The `xml`
/// prefix is always bound implicitly.
#[derive(Debug, Default)]
pub struct Scope<'p> {
    parent: Option<&'p Scope<'p>>,
    uri_to_prefix: IndexMap<String, String>,
    prefix_to_uri: HashMap<String, String>,
    preserve_whitespace: Option<bool>,
}

impl<'p> Scope<'p> {
    /// A root frame with no bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A frame nested inside this one.
    #[must_use]
    pub fn child(&self) -> Scope<'_> {
        Scope {
            parent: Some(self),
            ..Scope::default()
        }
    }

    /// The prefix bound to `uri` on this frame or an ancestor. The empty
    /// prefix means the default namespace.
    #[must_use]
    pub fn prefix_of(&self, uri: &str) -> Option<&str> {
        if uri == XML_NAMESPACE {
            return Some("xml");
        }
        self.uri_to_prefix
            .get(uri)
            .map(String::as_str)
            .or_else(|| self.parent.and_then(|parent| parent.prefix_of(uri)))
    }

    /// The uri bound to `prefix` on this frame or an ancestor.
    #[must_use]
    pub fn uri_of(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(XML_NAMESPACE);
        }
        self.prefix_to_uri
            .get(prefix)
            .map(String::as_str)
            .or_else(|| self.parent.and_then(|parent| parent.uri_of(prefix)))
    }

    /// Whether `uri` already has a prefix in this chain.
    #[must_use]
    pub fn is_addressable(&self, uri: &str) -> bool {
        self.prefix_of(uri).is_some()
    }

    /// Bind `uri` to `prefix` on this frame, replacing an earlier local binding
    /// of the same uri.
    pub fn bind(&mut self, uri: impl Into<String>, prefix: impl Into<String>) {
        let uri = uri.into();
        let prefix = prefix.into();
        if let Some(old) = self.uri_to_prefix.insert(uri.clone(), prefix.clone()) {
            self.prefix_to_uri.remove(&old);
        }
        self.prefix_to_uri.insert(prefix, uri);
    }

    /// Make `namespace` addressable from this frame.
    ///
    /// Returns the prefix bound on this frame, or `None` if the namespace was
    /// already addressable. The preferred prefix is tried first; when it is
    /// taken by another uri anywhere up the chain an increasing number is
    /// appended until the prefix is free.
    pub fn make_addressable(&mut self, namespace: &XmlNamespace) -> Option<String> {
        let uri = namespace.uri();
        if self.is_addressable(uri) {
            return None;
        }

        let mut base = namespace.default_prefix();
        if base.is_empty() && self.is_taken(&base) {
            base = derive_prefix(uri);
        }

        let mut prefix = base.clone();
        let mut suffix = 1_usize;
        while self.is_taken(&prefix) {
            prefix = format!("{base}{suffix}");
            suffix += 1;
        }

        self.bind(uri, prefix.clone());
        Some(prefix)
    }

    /// Bindings recorded on this frame, in the order they were made.
    pub fn local_bindings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.uri_to_prefix
            .iter()
            .map(|(uri, prefix)| (uri.as_str(), prefix.as_str()))
    }

    /// Whether whitespace is preserved here, inheriting from the parent when
    /// this frame has not decided.
    #[must_use]
    pub fn preserves_whitespace(&self) -> bool {
        match self.preserve_whitespace {
            Some(preserve) => preserve,
            None => self
                .parent
                .is_some_and(|parent| parent.preserves_whitespace()),
        }
    }

    /// Decide whitespace preservation for this frame and its descendants.
    pub fn set_preserve_whitespace(&mut self, preserve: bool) {
        self.preserve_whitespace = Some(preserve);
    }

    fn is_taken(&self, prefix: &str) -> bool {
        RESERVED_PREFIXES.contains(&prefix) || self.uri_of(prefix).is_some()
    }
}
