//! Concurrent per-member cache.
//!
//! Provides [`MemberCache`], a thread-safe map keyed by `(type, member name)`
//! used to memoize reflective lookups that are expensive to repeat, such as
//! walking a type hierarchy for a should-serialize predicate.

use dashmap::DashMap;

use crate::types::TypeKey;

/// Thread-safe cache of values keyed by a type and one of its members.
///
/// Each key is resolved at most once; concurrent callers for the same key
/// block on the shard lock while the first resolution runs.
///
/// # Examples
///
/// ```
/// use markwright_core::{MemberCache, TypeKey, TypeName};
///
/// let cache = MemberCache::<Option<u32>>::new();
/// let ty = TypeKey::new("demo", TypeName::new("Demo", "Widget"));
/// assert_eq!(cache.get_or_insert_with(&ty, "Width", || Some(1)), Some(1));
/// assert_eq!(cache.get_or_insert_with(&ty, "Width", || None), Some(1));
/// ```
#[derive(Debug)]
pub struct MemberCache<V> {
    inner: DashMap<(TypeKey, String), V>,
}

impl<V: Clone> MemberCache<V> {
    /// Create a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// Return the cached value for `(ty, member)`, resolving it on first use.
    pub fn get_or_insert_with(&self, ty: &TypeKey, member: &str, resolve: impl FnOnce() -> V) -> V {
        if let Some(hit) = self.inner.get(&(ty.clone(), member.to_owned())) {
            return hit.value().clone();
        }
        self.inner
            .entry((ty.clone(), member.to_owned()))
            .or_insert_with(resolve)
            .clone()
    }

    /// Return the cached value for `(ty, member)`, if resolved.
    #[must_use]
    pub fn get(&self, ty: &TypeKey, member: &str) -> Option<V> {
        self.inner
            .get(&(ty.clone(), member.to_owned()))
            .map(|v| v.clone())
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        self.inner.clear();
    }

    /// Number of resolved entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether nothing has been resolved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<V: Clone> Default for MemberCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
