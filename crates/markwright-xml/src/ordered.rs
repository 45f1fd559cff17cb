//! Topologically ordered container for deferred properties.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// A list whose enumeration order honors `predecessor -> key` constraints.
///
/// Keys without constraints keep their insertion order. An ordering
/// constraint may name a key before its value is known; such keys are
/// placeholders and are skipped during enumeration until [`add`] supplies a
/// value.
///
/// Cycles are not reported. Depth-first search stops at a node it is still
/// expanding, which drops the constraint that closes the cycle.
///
/// [`add`]: PartiallyOrderedList::add
#[derive(Debug)]
pub struct PartiallyOrderedList<K, V> {
    entries: Vec<Entry<K, V>>,
    index: HashMap<K, usize>,
    order: OnceCell<Vec<usize>>,
}

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: Option<V>,
    predecessors: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unseen,
    InProgress,
    Finished,
}

impl<K, V> Default for PartiallyOrderedList<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            order: OnceCell::new(),
        }
    }
}

impl<K, V> PartiallyOrderedList<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries that carry a value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.value.is_some()).count()
    }

    /// Whether no entry carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store `value` under `key`, filling a placeholder left by
    /// [`set_order`](Self::set_order) and keeping its constraints.
    pub fn add(&mut self, key: K, value: V) {
        let node = self.node(key);
        self.entries[node].value = Some(value);
        self.order.take();
    }

    /// Require `predecessor` to be enumerated before `key`.
    pub fn set_order(&mut self, predecessor: K, key: K) {
        let before = self.node(predecessor);
        let after = self.node(key);
        let predecessors = &mut self.entries[after].predecessors;
        if !predecessors.contains(&before) {
            predecessors.push(before);
        }
        self.order.take();
    }

    /// Entries in resolved order, placeholders skipped.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.resolved().iter().filter_map(|&node| {
            let entry = &self.entries[node];
            entry.value.as_ref().map(|value| (&entry.key, value))
        })
    }

    /// Consume the list, yielding values in resolved order.
    #[must_use]
    pub fn into_values(self) -> Vec<V> {
        let order = self.resolved().to_vec();
        let mut slots: Vec<Option<V>> = self.entries.into_iter().map(|e| e.value).collect();
        order
            .into_iter()
            .filter_map(|node| slots[node].take())
            .collect()
    }

    fn node(&mut self, key: K) -> usize {
        if let Some(&node) = self.index.get(&key) {
            return node;
        }
        let node = self.entries.len();
        self.index.insert(key.clone(), node);
        self.entries.push(Entry {
            key,
            value: None,
            predecessors: Vec::new(),
        });
        node
    }

    fn resolved(&self) -> &[usize] {
        self.order.get_or_init(|| {
            let mut marks = vec![Mark::Unseen; self.entries.len()];
            let mut order = Vec::with_capacity(self.entries.len());
            for node in 0..self.entries.len() {
                self.visit(node, &mut marks, &mut order);
            }
            order
        })
    }

    fn visit(&self, node: usize, marks: &mut [Mark], order: &mut Vec<usize>) {
        match marks[node] {
            Mark::Finished => return,
            Mark::InProgress => {
                tracing::debug!(key = ?self.entries[node].key, "ordering cycle, constraint dropped");
                return;
            }
            Mark::Unseen => {}
        }
        marks[node] = Mark::InProgress;
        for &predecessor in &self.entries[node].predecessors {
            self.visit(predecessor, marks, order);
        }
        marks[node] = Mark::Finished;
        order.push(node);
    }
}
