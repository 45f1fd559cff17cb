//! Per-session serialization context.

use std::sync::Arc;

use markwright_core::{MemberCache, XmlNamespace};
use markwright_model::{
    DefaultSerializationManager, PropertyDescriptor, SerializationManager, ShouldSerialize,
    TypeInfo, ValueSerializer,
};

/// The manager plus the caches shared by every object of one writer.
///
/// Cloning is cheap and clones share the caches.
#[derive(Debug, Clone)]
pub struct MarkupContext {
    inner: Arc<ContextInner>,
}

#[derive(Debug)]
struct ContextInner {
    manager: Arc<dyn SerializationManager>,
    should_serialize: MemberCache<Option<ShouldSerialize>>,
}

impl MarkupContext {
    /// Create a context around `manager`.
    pub fn new(manager: Arc<dyn SerializationManager>) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                manager,
                should_serialize: MemberCache::new(),
            }),
        }
    }

    /// The serialization manager.
    #[must_use]
    pub fn manager(&self) -> &dyn SerializationManager {
        self.inner.manager.as_ref()
    }

    pub(crate) fn value_serializer_for(&self, ty: &TypeInfo) -> Option<Arc<dyn ValueSerializer>> {
        self.inner.manager.value_serializer_for(ty)
    }

    pub(crate) fn value_serializer_for_property(
        &self,
        property: &PropertyDescriptor,
    ) -> Option<Arc<dyn ValueSerializer>> {
        self.inner.manager.value_serializer_for_property(property)
    }

    pub(crate) fn xml_namespace_of(&self, ty: &TypeInfo) -> XmlNamespace {
        self.inner.manager.xml_namespace_of(ty)
    }

    /// The should-serialize predicate `owner` declares for `property`.
    ///
    /// Resolved once per `(owner, property)` and cached, including the
    /// absence of a predicate.
    #[must_use]
    pub fn should_serialize(&self, owner: &TypeInfo, property: &str) -> Option<ShouldSerialize> {
        self.inner
            .should_serialize
            .get_or_insert_with(&owner.type_key(), property, || {
                owner.find_should_serialize(property)
            })
    }

    /// Number of resolved should-serialize lookups.
    #[must_use]
    pub fn cached_predicates(&self) -> usize {
        self.inner.should_serialize.len()
    }
}

impl Default for MarkupContext {
    fn default() -> Self {
        Self::new(Arc::new(DefaultSerializationManager))
    }
}
