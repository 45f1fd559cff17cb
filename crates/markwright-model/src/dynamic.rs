//! A data-driven [`MarkupInstance`].

use std::sync::Arc;

use parking_lot::RwLock;

use crate::property::PropertyDescriptor;
use crate::types::{TypeKind, TypeRef};
use crate::value::{MarkupInstance, Value};

/// An object whose properties, items, and entries are plain data.
///
/// Mutations through the `&self` methods are visible to the next
/// enumeration, so a shared instance can be filled after it has been linked
/// into a graph.
#[derive(Debug)]
pub struct DynamicObject {
    type_info: TypeRef,
    properties: RwLock<Vec<(PropertyDescriptor, Value)>>,
    items: RwLock<Option<Vec<Value>>>,
    entries: RwLock<Option<Vec<(Value, Value)>>>,
    text: Option<String>,
}

impl DynamicObject {
    /// Create an empty instance of `type_info`.
    ///
    /// Collection types start with no items, dictionary types with no
    /// entries; other types enumerate neither.
    pub fn new(type_info: TypeRef) -> Self {
        let items = (type_info.kind == TypeKind::Collection).then(Vec::new);
        let entries = (type_info.kind == TypeKind::Dictionary).then(Vec::new);
        Self {
            type_info,
            properties: RwLock::new(Vec::new()),
            items: RwLock::new(items),
            entries: RwLock::new(entries),
            text: None,
        }
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(self, property: PropertyDescriptor, value: impl Into<Value>) -> Self {
        self.set(property, value);
        self
    }

    /// Builder form of [`push_item`](Self::push_item).
    #[must_use]
    pub fn with_item(self, item: impl Into<Value>) -> Self {
        self.push_item(item);
        self
    }

    /// Builder form of [`insert_entry`](Self::insert_entry).
    #[must_use]
    pub fn with_entry(self, key: impl Into<Value>, value: impl Into<Value>) -> Self {
        self.insert_entry(key, value);
        self
    }

    /// Override the display text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set a property value, replacing any value set under the same name.
    pub fn set(&self, property: PropertyDescriptor, value: impl Into<Value>) {
        let value = value.into();
        let mut properties = self.properties.write();
        match properties.iter_mut().find(|(p, _)| p.name == property.name) {
            Some(slot) => *slot = (property, value),
            None => properties.push((property, value)),
        }
    }

    /// Remove a property value; returns whether it was present.
    pub fn remove(&self, name: &str) -> bool {
        let mut properties = self.properties.write();
        let before = properties.len();
        properties.retain(|(p, _)| p.name != name);
        properties.len() != before
    }

    /// Append an item, making the instance enumerable if it was not.
    pub fn push_item(&self, item: impl Into<Value>) {
        self.items
            .write()
            .get_or_insert_with(Vec::new)
            .push(item.into());
    }

    /// Add or replace a keyed entry.
    pub fn insert_entry(&self, key: impl Into<Value>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let mut entries = self.entries.write();
        let entries = entries.get_or_insert_with(Vec::new);
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => entries.push((key, value)),
        }
    }

    /// Wrap into a [`Value`].
    pub fn into_value(self) -> Value {
        Value::Object(Arc::new(self))
    }
}

impl MarkupInstance for DynamicObject {
    fn type_info(&self) -> TypeRef {
        self.type_info.clone()
    }

    fn properties(&self) -> Vec<PropertyDescriptor> {
        self.properties
            .read()
            .iter()
            .map(|(p, _)| p.clone())
            .collect()
    }

    fn value(&self, property: &PropertyDescriptor) -> Value {
        self.properties
            .read()
            .iter()
            .find(|(p, _)| p.name == property.name)
            .map(|(_, v)| v.clone())
            .or_else(|| property.default_value.clone())
            .unwrap_or_default()
    }

    fn items(&self) -> Option<Vec<Value>> {
        self.items.read().clone()
    }

    fn entries(&self) -> Option<Vec<(Value, Value)>> {
        self.entries.read().clone()
    }

    fn text(&self) -> String {
        self.text
            .clone()
            .unwrap_or_else(|| self.type_info.full_name())
    }
}
