use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

/// Shared error type for the idcheck crates.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum CoreError {
    #[error("invalid view class name: {0:?}")]
    InvalidClassName(String),
}

/// Name of a view class in the host toolkit.
///
/// Classes are compared by name. Subtyping is expressed by the host through
/// [`ViewNode::lineage`], never by the class value itself.
#[cfg_attr(
    feature = "serde-full",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ViewClass(Cow<'static, str>);

impl ViewClass {
    pub const VIEW: ViewClass = ViewClass::from_static("View");
    pub const CONTROL: ViewClass = ViewClass::from_static("Control");
    pub const TEXT_VIEW: ViewClass = ViewClass::from_static("TextView");
    pub const NAVIGATION_BAR: ViewClass = ViewClass::from_static("NavigationBar");
    pub const SEARCH_BAR: ViewClass = ViewClass::from_static("SearchBar");
    pub const TOOLBAR: ViewClass = ViewClass::from_static("Toolbar");
    pub const TAB_BAR: ViewClass = ViewClass::from_static("TabBar");
    pub const STEPPER: ViewClass = ViewClass::from_static("Stepper");

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Result<Self, CoreError> {
        let name = name.into();
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '.' || c == ':');
        if !valid {
            return Err(CoreError::InvalidClassName(name));
        }
        Ok(Self(Cow::Owned(name)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ViewClass {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::str::FromStr for ViewClass {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<ViewClass> for String {
    fn from(value: ViewClass) -> Self {
        value.0.into_owned()
    }
}

/// Read-only view of a node in the host's UI tree.
///
/// Nodes are handed out as `Arc<Self>`; the allocation is the node's identity.
/// The checker never mutates a node and never keeps one alive past a pass.
pub trait ViewNode: Sized + Send + Sync + 'static {
    /// Accessibility identifier, `None` when unset.
    fn identifier(&self) -> Option<Cow<'_, str>>;

    /// Snapshot of the current children, in display order.
    fn children(&self) -> Vec<Arc<Self>>;

    /// The node's runtime class followed by every ancestor class, most-derived first.
    fn lineage(&self) -> &[ViewClass];

    /// `false` once the host has torn the node down while it is still reachable.
    fn is_attached(&self) -> bool {
        true
    }

    /// "is-a" check against the node's lineage.
    fn is_kind_of(&self, class: &ViewClass) -> bool {
        self.lineage().iter().any(|candidate| candidate == class)
    }
}

#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct CheckerId(pub String);

impl CheckerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for CheckerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CheckerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
