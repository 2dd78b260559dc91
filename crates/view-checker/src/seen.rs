use std::collections::HashSet;
use std::sync::Arc;

use crate::model::WeakNodeRef;

/// Identities of nodes already reported.
///
/// Grows monotonically: entries for released nodes stay until
/// [`SeenSet::purge_released`] or [`SeenSet::clear`] is called explicitly.
/// Each such entry costs one reserved node allocation.
pub struct SeenSet<N> {
    entries: HashSet<WeakNodeRef<N>>,
}

impl<N> SeenSet<N> {
    pub fn new() -> Self {
        Self {
            entries: HashSet::new(),
        }
    }

    pub fn contains(&self, node: &Arc<N>) -> bool {
        self.entries.contains(&WeakNodeRef::new(node))
    }

    /// Returns `true` if the node was not present yet.
    pub fn insert(&mut self, node: &Arc<N>) -> bool {
        self.entries.insert(WeakNodeRef::new(node))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| !entry.is_released())
            .count()
    }

    /// Drops entries whose node is gone. Returns how many were removed.
    pub fn purge_released(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !entry.is_released());
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<N> Default for SeenSet<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> std::fmt::Debug for SeenSet<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeenSet")
            .field("len", &self.entries.len())
            .finish()
    }
}
