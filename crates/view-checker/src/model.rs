use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use serde::Serialize;

/// Non-owning handle to a node, compared and hashed by node identity.
///
/// The wrapped `Weak` keeps the node's allocation reserved (though not the
/// node itself), so the address used for hashing cannot be handed to a
/// different node while this reference exists. A released node therefore
/// never compares equal to a live one.
pub struct WeakNodeRef<N> {
    inner: Weak<N>,
}

impl<N> WeakNodeRef<N> {
    pub fn new(node: &Arc<N>) -> Self {
        Self {
            inner: Arc::downgrade(node),
        }
    }

    pub fn upgrade(&self) -> Option<Arc<N>> {
        self.inner.upgrade()
    }

    pub fn is_released(&self) -> bool {
        self.inner.strong_count() == 0
    }

    pub fn refers_to(&self, node: &Arc<N>) -> bool {
        std::ptr::eq(self.address(), Arc::as_ptr(node).cast::<()>())
    }

    fn address(&self) -> *const () {
        self.inner.as_ptr().cast::<()>()
    }
}

impl<N> Clone for WeakNodeRef<N> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<N> PartialEq for WeakNodeRef<N> {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.inner, &other.inner)
    }
}

impl<N> Eq for WeakNodeRef<N> {}

impl<N> Hash for WeakNodeRef<N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address().hash(state);
    }
}

impl<N> fmt::Debug for WeakNodeRef<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakNodeRef")
            .field("address", &self.address())
            .field("released", &self.is_released())
            .finish()
    }
}

/// Strong, identity-keyed handle used for the per-pass visited set.
pub(crate) struct VisitedKey<N>(pub(crate) Arc<N>);

impl<N> PartialEq for VisitedKey<N> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<N> Eq for VisitedKey<N> {}

impl<N> Hash for VisitedKey<N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).cast::<()>().hash(state);
    }
}

/// What a single pass saw.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct PassSummary {
    /// `false` when the root provider had nothing to offer.
    pub had_root: bool,
    pub visited: usize,
    pub checkable: usize,
    pub unidentified: usize,
    pub reported: usize,
    /// Non-traversable nodes whose children were skipped.
    pub pruned: usize,
    pub detached: usize,
    pub revisits: usize,
}

impl PassSummary {
    pub fn empty() -> Self {
        Self::default()
    }
}
