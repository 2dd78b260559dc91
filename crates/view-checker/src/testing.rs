use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use idcheck_core_types::{ViewClass, ViewNode};
use parking_lot::Mutex;

pub(crate) struct TestView {
    pub(crate) name: &'static str,
    lineage: Vec<ViewClass>,
    identifier: Mutex<Option<String>>,
    children: Mutex<Vec<Arc<TestView>>>,
    attached: AtomicBool,
}

impl TestView {
    pub(crate) fn new(name: &'static str, lineage: &[&'static str]) -> Arc<Self> {
        Arc::new(Self {
            name,
            lineage: lineage.iter().copied().map(ViewClass::from_static).collect(),
            identifier: Mutex::new(None),
            children: Mutex::new(Vec::new()),
            attached: AtomicBool::new(true),
        })
    }

    pub(crate) fn plain(name: &'static str) -> Arc<Self> {
        Self::new(name, &["View"])
    }

    pub(crate) fn button(name: &'static str) -> Arc<Self> {
        Self::new(name, &["Button", "Control", "View"])
    }

    pub(crate) fn add(self: &Arc<Self>, child: &Arc<TestView>) -> Arc<Self> {
        self.children.lock().push(Arc::clone(child));
        Arc::clone(self)
    }

    pub(crate) fn set_identifier(&self, id: &str) {
        *self.identifier.lock() = Some(id.to_string());
    }

    pub(crate) fn clear_children(&self) {
        self.children.lock().clear();
    }

    pub(crate) fn detach(&self) {
        self.attached.store(false, Ordering::SeqCst);
    }
}

impl ViewNode for TestView {
    fn identifier(&self) -> Option<Cow<'_, str>> {
        self.identifier.lock().clone().map(Cow::Owned)
    }

    fn children(&self) -> Vec<Arc<Self>> {
        self.children.lock().clone()
    }

    fn lineage(&self) -> &[ViewClass] {
        &self.lineage
    }

    fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for TestView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.lineage[0], self.name)
    }
}
