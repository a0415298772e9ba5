//! Tree builder - assembles a [`SyntaxTree`] from start/finish events

use crate::error::{Span, TreeError};
use crate::syntax::{NodeId, SyntaxKind, SyntaxNode, SyntaxTree, TokenKind};

/// Incremental builder for [`SyntaxTree`]
///
/// Inner nodes are opened with [`start_node`](Self::start_node) and closed with
/// [`finish_node`](Self::finish_node); leaves are added with
/// [`token`](Self::token) and [`ident`](Self::ident). The span of an inner
/// node is the union of its children's spans.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<SyntaxNode>,
    roots: Vec<NodeId>,
    open: Vec<NodeId>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an inner node under the currently open node
    pub fn start_node(&mut self, kind: SyntaxKind) -> NodeId {
        let id = self.push(kind, None, Span::default());
        self.open.push(id);
        id
    }

    /// Close the most recently opened node
    pub fn finish_node(&mut self) -> Result<NodeId, TreeError> {
        let id = self.open.pop().ok_or(TreeError::NoOpenNode)?;
        let span = self.nodes[id.index()]
            .children
            .iter()
            .map(|child| self.nodes[child.index()].span)
            .reduce(Span::cover);
        if let Some(span) = span {
            self.nodes[id.index()].span = span;
        }
        Ok(id)
    }

    /// Add a terminal token
    pub fn token(&mut self, kind: TokenKind, text: impl Into<String>, span: Span) -> NodeId {
        self.push(SyntaxKind::Token(kind), Some(text.into()), span)
    }

    /// Add an identifier leaf
    pub fn ident(&mut self, text: impl Into<String>, span: Span) -> NodeId {
        self.push(SyntaxKind::Identifier, Some(text.into()), span)
    }

    pub(super) fn set_span(&mut self, id: NodeId, span: Span) {
        self.nodes[id.index()].span = span;
    }

    fn push(&mut self, kind: SyntaxKind, text: Option<String>, span: Span) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        let parent = self.open.last().copied();
        self.nodes.push(SyntaxNode {
            kind,
            parent,
            children: Vec::new(),
            span,
            text,
        });
        match parent {
            Some(parent) => self.nodes[parent.index()].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Finish building; every opened node must have been closed
    pub fn finish(self) -> Result<SyntaxTree, TreeError> {
        if !self.open.is_empty() {
            return Err(TreeError::UnclosedNodes(self.open.len()));
        }
        Ok(SyntaxTree {
            nodes: self.nodes,
            roots: self.roots,
        })
    }
}
