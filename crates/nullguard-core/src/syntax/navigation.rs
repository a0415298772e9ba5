//! Grammar-independent tree navigation

use crate::syntax::{NodeId, SyntaxKind, SyntaxTree};

/// Nearest proper ancestor of `node` whose kind is in `kinds`
pub fn find_enclosing(tree: &SyntaxTree, node: NodeId, kinds: &[SyntaxKind]) -> Option<NodeId> {
    let mut current = tree.parent(node);
    while let Some(id) = current {
        if kinds.contains(&tree.kind(id)) {
            return Some(id);
        }
        current = tree.parent(id);
    }
    None
}

/// Pre-order iterator over the descendants of a node (the node itself excluded)
#[derive(Debug, Clone)]
pub struct Descendants<'t> {
    tree: &'t SyntaxTree,
    stack: Vec<NodeId>,
}

impl<'t> Descendants<'t> {
    pub fn new(tree: &'t SyntaxTree, node: NodeId) -> Self {
        let stack = tree.children(node).iter().rev().copied().collect();
        Self { tree, stack }
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack.extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

/// Every descendant of `node` of the given kind, in document order
pub fn descendants_of_kind(
    tree: &SyntaxTree,
    node: NodeId,
    kind: SyntaxKind,
) -> impl Iterator<Item = NodeId> + '_ {
    Descendants::new(tree, node).filter(move |&id| tree.kind(id) == kind)
}
