//! Arena-backed, read-only syntax tree

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Span, TreeError};
use crate::syntax::{JoinKind, SyntaxKind, TokenKind};

/// Index of a node inside its [`SyntaxTree`]
///
/// Ids are handed out in creation order, which for trees built by
/// [`TreeBuilder`](crate::syntax::TreeBuilder) is document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One node of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub(crate) kind: SyntaxKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) span: Span,
    pub(crate) text: Option<String>,
}

impl SyntaxNode {
    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Source text of a leaf (identifier or token)
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// A document's forest of query trees
///
/// Nodes live in one arena and refer to each other by [`NodeId`]. Parent links
/// are plain data used for upward navigation only. The accessors taking a
/// `NodeId` panic when given an id that does not belong to this tree; use
/// [`SyntaxTree::node`] to validate ids coming from elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntaxTree {
    pub(crate) nodes: Vec<SyntaxNode>,
    pub(crate) roots: Vec<NodeId>,
}

impl SyntaxTree {
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node, failing for ids that are not part of this tree
    pub fn node(&self, id: NodeId) -> Result<&SyntaxNode, TreeError> {
        self.nodes.get(id.index()).ok_or(TreeError::UnknownNode(id))
    }

    /// Iterate over every node id in document order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::from_index)
    }

    pub fn kind(&self, id: NodeId) -> SyntaxKind {
        self.nodes[id.index()].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.nodes[id.index()].text.as_deref()
    }

    /// Whether `id` is the terminal token `token`
    pub fn is_token(&self, id: NodeId, token: TokenKind) -> bool {
        self.kind(id) == SyntaxKind::Token(token)
    }

    /// Concatenated text of all leaves under `id`, in document order
    pub fn leaf_text(&self, id: NodeId) -> String {
        if let Some(text) = self.text(id) {
            return text.to_string();
        }
        self.children(id)
            .iter()
            .map(|&child| self.leaf_text(child))
            .collect()
    }

    fn child_of_kind(&self, id: NodeId, kind: SyntaxKind) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.kind(child) == kind)
    }

    fn children_of_kind(&self, id: NodeId, kind: SyntaxKind) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&child| self.kind(child) == kind)
    }

    // Grammar-aware accessors. All of them fail closed: a missing or
    // misplaced part yields `None` rather than an error.

    /// SELECT list of a query
    pub fn selected_fields(&self, query: NodeId) -> Option<NodeId> {
        self.child_of_kind(query, SyntaxKind::SelectedFields)
    }

    /// Conditions following the `WHERE` keyword of a query
    pub fn where_clause(&self, query: NodeId) -> Option<NodeId> {
        let children = self.children(query);
        let keyword = children
            .iter()
            .position(|&child| self.is_token(child, TokenKind::Where))?;
        children[keyword + 1..]
            .iter()
            .copied()
            .find(|&child| self.kind(child) == SyntaxKind::SearchConditions)
    }

    /// The individual conditions of a condition list
    pub fn conditions(&self, search_conditions: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children_of_kind(search_conditions, SyntaxKind::SearchCondition)
    }

    /// Join kind named by the join part's keyword; INNER when none is present
    pub fn join_kind(&self, join_part: NodeId) -> JoinKind {
        self.children(join_part)
            .iter()
            .find_map(|&child| match self.kind(child) {
                SyntaxKind::Token(TokenKind::LeftJoin) => Some(JoinKind::Left),
                SyntaxKind::Token(TokenKind::RightJoin) => Some(JoinKind::Right),
                SyntaxKind::Token(TokenKind::FullJoin) => Some(JoinKind::Full),
                SyntaxKind::Token(TokenKind::InnerJoin) => Some(JoinKind::Inner),
                _ => None,
            })
            .unwrap_or(JoinKind::Inner)
    }

    /// Data source brought in by a join part
    pub fn join_data_source(&self, join_part: NodeId) -> Option<NodeId> {
        self.child_of_kind(join_part, SyntaxKind::DataSource)
    }

    /// ON condition of a join part
    pub fn join_condition(&self, join_part: NodeId) -> Option<NodeId> {
        self.child_of_kind(join_part, SyntaxKind::SearchConditions)
    }

    /// Join parts attached directly to a data source
    pub fn join_parts(&self, data_source: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children_of_kind(data_source, SyntaxKind::JoinPart)
    }

    /// Alias bound to a data source
    pub fn alias_name(&self, data_source: NodeId) -> Option<&str> {
        let alias = self.child_of_kind(data_source, SyntaxKind::Alias)?;
        let ident = self.child_of_kind(alias, SyntaxKind::Identifier)?;
        self.text(ident)
    }

    /// Table qualifier of a column reference (`b` in `b.y`)
    pub fn column_qualifier(&self, column: NodeId) -> Option<&str> {
        let children = self.children(column);
        let dot = children
            .iter()
            .position(|&child| self.is_token(child, TokenKind::Dot))?;
        let qualifier = *children.get(dot.checked_sub(1)?)?;
        if self.kind(qualifier) != SyntaxKind::Identifier {
            return None;
        }
        self.text(qualifier)
    }

    /// Whether `id` is a call of the null-coalescing built-in
    pub fn is_null_coalescing_call(&self, id: NodeId) -> bool {
        self.kind(id) == SyntaxKind::BuiltInFunctionCall
            && self
                .children(id)
                .iter()
                .any(|&child| self.is_token(child, TokenKind::IsNull))
    }
}
