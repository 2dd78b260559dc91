use idcheck_core_types::ViewNode;

use crate::policy::ClassificationRules;

/// Decides which nodes need an identifier and which subtrees are visited.
///
/// Both questions are answered from the node's lineage alone, so they are
/// independent of each other: a non-traversable node can still be checkable.
/// A class that matches no rule is not checkable and is traversable.
#[derive(Clone, Debug, Default)]
pub struct Classifier {
    rules: ClassificationRules,
}

impl Classifier {
    pub fn new(rules: ClassificationRules) -> Self {
        Self { rules }
    }

    pub fn is_checkable<N: ViewNode>(&self, node: &N) -> bool {
        self.rules.checkable().any(|class| node.is_kind_of(class))
    }

    pub fn is_traversable<N: ViewNode>(&self, node: &N) -> bool {
        !self
            .rules
            .non_traversable()
            .iter()
            .any(|class| node.is_kind_of(class))
    }

    /// Checkable with a missing or empty identifier.
    pub fn needs_identifier<N: ViewNode>(&self, node: &N) -> bool {
        self.is_checkable(node) && !has_identifier(node)
    }
}

pub fn has_identifier<N: ViewNode>(node: &N) -> bool {
    node.identifier().is_some_and(|id| !id.is_empty())
}
