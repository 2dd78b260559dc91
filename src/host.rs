//! Reference host: a view tree described in a JSON or YAML file.
//!
//! ```yaml
//! classes:
//!   PrimaryButton: Button
//! root:
//!   class: View
//!   children:
//!     - class: PrimaryButton
//!       label: Sign in
//! ```

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use idcheck_core_types::{ViewClass, ViewNode};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use view_checker::RootProvider;

use crate::errors::{IdcheckError, Result};

/// Class -> superclass pairs every tree file starts from.
const BUILTIN_CLASSES: &[(&str, &str)] = &[
    ("Control", "View"),
    ("TextView", "View"),
    ("Label", "View"),
    ("ImageView", "View"),
    ("NavigationBar", "View"),
    ("SearchBar", "View"),
    ("Toolbar", "View"),
    ("TabBar", "View"),
    ("ScrollView", "View"),
    ("StackView", "View"),
    ("TableView", "ScrollView"),
    ("CollectionView", "ScrollView"),
    ("Button", "Control"),
    ("Switch", "Control"),
    ("Slider", "Control"),
    ("Stepper", "Control"),
    ("TextField", "Control"),
    ("SegmentedControl", "Control"),
    ("DatePicker", "Control"),
    ("PageControl", "Control"),
];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TreeDocument {
    /// Extra classes, each mapped to its superclass.
    #[serde(default)]
    pub classes: BTreeMap<String, String>,
    pub root: NodeSpec,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeSpec {
    pub class: String,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TreeFormat {
    Json,
    Yaml,
}

impl TreeFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Ok(Self::Json),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            _ => Err(IdcheckError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Single-inheritance class table used to compute node lineages.
#[derive(Clone, Debug)]
pub struct ClassHierarchy {
    parents: HashMap<ViewClass, ViewClass>,
}

impl ClassHierarchy {
    pub fn builtin() -> Self {
        let parents = BUILTIN_CLASSES
            .iter()
            .map(|&(class, parent)| (ViewClass::from_static(class), ViewClass::from_static(parent)))
            .collect();
        Self { parents }
    }

    /// Adds `class -> superclass` pairs. Every superclass must be `View`, a
    /// built-in class or declared in the same batch, and the result must stay
    /// acyclic. Built-in classes keep their place: restating one with its own
    /// superclass is accepted, moving it is an error.
    pub fn extend(&mut self, declared: &BTreeMap<String, String>) -> Result<()> {
        for (class, parent) in declared {
            let builtin_parent = if class.as_str() == ViewClass::VIEW.as_str() {
                Some(None)
            } else {
                BUILTIN_CLASSES
                    .iter()
                    .find(|&&(name, _)| name == class.as_str())
                    .map(|&(_, parent)| Some(parent))
            };
            if let Some(expected) = builtin_parent {
                if expected != Some(parent.as_str()) {
                    return Err(IdcheckError::BuiltinRedefinition {
                        class: class.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }
        for (class, parent) in declared {
            self.parents
                .insert(ViewClass::new(class.as_str())?, ViewClass::new(parent.as_str())?);
        }
        for (class, parent) in declared {
            let parent_class = ViewClass::new(parent.as_str())?;
            if !self.is_known(&parent_class) {
                return Err(IdcheckError::UnknownSuperclass {
                    class: class.clone(),
                    parent: parent.clone(),
                });
            }
            self.check_acyclic(&ViewClass::new(class.as_str())?)?;
        }
        Ok(())
    }

    pub fn is_known(&self, class: &ViewClass) -> bool {
        *class == ViewClass::VIEW || self.parents.contains_key(class)
    }

    /// `class` followed by its ancestors. An unknown class has only itself.
    pub fn lineage(&self, class: &ViewClass) -> Vec<ViewClass> {
        let mut lineage = vec![class.clone()];
        let mut current = class;
        while let Some(parent) = self.parents.get(current) {
            if lineage.contains(parent) {
                break;
            }
            lineage.push(parent.clone());
            current = parent;
        }
        lineage
    }

    fn check_acyclic(&self, start: &ViewClass) -> Result<()> {
        let mut current = start;
        for _ in 0..=self.parents.len() {
            match self.parents.get(current) {
                Some(parent) if parent == start => {
                    return Err(IdcheckError::ClassCycle(start.to_string()))
                }
                Some(parent) => current = parent,
                None => return Ok(()),
            }
        }
        Err(IdcheckError::ClassCycle(start.to_string()))
    }
}

impl Default for ClassHierarchy {
    fn default() -> Self {
        Self::builtin()
    }
}

/// A node of a loaded tree. Immutable; a reload builds fresh nodes.
pub struct HostView {
    path: String,
    label: Option<String>,
    identifier: Option<String>,
    lineage: Vec<ViewClass>,
    children: Vec<Arc<HostView>>,
}

impl HostView {
    /// Slash-separated location, e.g. `View/StackView[0]/Button[1]`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn class(&self) -> &ViewClass {
        &self.lineage[0]
    }

    fn build(spec: &NodeSpec, hierarchy: &ClassHierarchy, path: String) -> Result<Arc<Self>> {
        let class = ViewClass::new(spec.class.as_str())?;
        if !hierarchy.is_known(&class) {
            debug!(class = %class, path = %path, "undeclared class; treated as a plain view");
        }
        let children = spec
            .children
            .iter()
            .enumerate()
            .map(|(index, child)| {
                let child_path = format!("{path}/{}[{index}]", child.class);
                Self::build(child, hierarchy, child_path)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Arc::new(Self {
            lineage: hierarchy.lineage(&class),
            path,
            label: spec.label.clone(),
            identifier: spec.identifier.clone(),
            children,
        }))
    }
}

impl ViewNode for HostView {
    fn identifier(&self) -> Option<Cow<'_, str>> {
        self.identifier.as_deref().map(Cow::Borrowed)
    }

    fn children(&self) -> Vec<Arc<Self>> {
        self.children.clone()
    }

    fn lineage(&self) -> &[ViewClass] {
        &self.lineage
    }
}

impl fmt::Debug for HostView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class())?;
        if let Some(label) = &self.label {
            write!(f, " {label:?}")?;
        }
        write!(f, " at {}", self.path)
    }
}

impl TreeDocument {
    pub fn parse(content: &str, format: TreeFormat, origin: &Path) -> Result<Self> {
        match format {
            TreeFormat::Json => {
                serde_json::from_str(content).map_err(|err| IdcheckError::parse(origin, err))
            }
            TreeFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|err| IdcheckError::parse(origin, err))
            }
        }
    }

    pub fn build(&self) -> Result<Arc<HostView>> {
        let mut hierarchy = ClassHierarchy::builtin();
        hierarchy.extend(&self.classes)?;
        HostView::build(&self.root, &hierarchy, self.root.class.clone())
    }
}

pub fn load_tree(path: &Path) -> Result<Arc<HostView>> {
    let format = TreeFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| IdcheckError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    TreeDocument::parse(&content, format, path)?.build()
}

/// Change marker for the tree file. The length catches rewrites that land
/// within one tick of a coarse modification clock.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct FileStamp {
    modified: SystemTime,
    len: u64,
}

#[derive(Default)]
struct SourceState {
    stamp: Option<FileStamp>,
    root: Option<Arc<HostView>>,
}

/// Root provider backed by a tree file, reloaded whenever its modification
/// time or length changes. A reload yields new node identities, so nodes in the new
/// tree are reported afresh. A missing file yields no root; a file that fails
/// to parse keeps the previous tree.
pub struct TreeSource {
    path: PathBuf,
    state: Mutex<SourceState>,
}

impl TreeSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(SourceState::default()),
        }
    }
}

impl RootProvider<HostView> for TreeSource {
    fn root(&self) -> Option<Arc<HostView>> {
        let current = std::fs::metadata(&self.path)
            .and_then(|meta| {
                Ok(FileStamp {
                    modified: meta.modified()?,
                    len: meta.len(),
                })
            })
            .ok();
        let mut state = self.state.lock();

        let Some(stamp) = current else {
            if state.root.take().is_some() {
                warn!(path = %self.path.display(), "tree file disappeared");
            }
            state.stamp = None;
            return None;
        };

        if state.stamp != Some(stamp) {
            state.stamp = Some(stamp);
            match load_tree(&self.path) {
                Ok(root) => {
                    info!(path = %self.path.display(), "tree loaded");
                    state.root = Some(root);
                }
                Err(err) => {
                    warn!(path = %self.path.display(), error = %err, "tree reload failed; keeping previous tree");
                }
            }
        }
        state.root.clone()
    }
}
