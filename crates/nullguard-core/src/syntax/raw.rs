//! Serialized form of a syntax tree, as handed over by the parser

use serde::{Deserialize, Serialize};

use crate::error::{Span, TreeError};
use crate::syntax::{NodeId, SyntaxKind, SyntaxTree, TreeBuilder};

/// A nested node as it appears in a JSON tree document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNode {
    pub kind: SyntaxKind,
    /// Omitted for inner nodes whose span should be derived from children
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RawNode>,
}

/// One analyzed document: optional source text plus its query trees
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocument {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub roots: Vec<RawNode>,
}

impl SyntaxTree {
    /// Build an arena tree from nested nodes, populating parent links
    pub fn from_raw(roots: &[RawNode]) -> Result<Self, TreeError> {
        let mut builder = TreeBuilder::new();
        for root in roots {
            lower(&mut builder, root)?;
        }
        builder.finish()
    }
}

fn is_leaf(kind: SyntaxKind) -> bool {
    matches!(kind, SyntaxKind::Identifier | SyntaxKind::Token(_))
}

fn lower(builder: &mut TreeBuilder, raw: &RawNode) -> Result<NodeId, TreeError> {
    let span = raw.span.unwrap_or_default();
    if is_leaf(raw.kind) && !raw.children.is_empty() {
        return Err(TreeError::ChildrenOnLeaf(raw.kind));
    }
    match raw.kind {
        SyntaxKind::Token(token) => {
            let text = raw.text.clone().unwrap_or_default();
            Ok(builder.token(token, text, span))
        }
        SyntaxKind::Identifier => {
            let text = raw.text.clone().unwrap_or_default();
            Ok(builder.ident(text, span))
        }
        kind => {
            if raw.text.is_some() {
                return Err(TreeError::TextOnInnerNode(kind));
            }
            builder.start_node(kind);
            for child in &raw.children {
                lower(builder, child)?;
            }
            let id = builder.finish_node()?;
            if let Some(span) = raw.span {
                builder.set_span(id, span);
            }
            Ok(id)
        }
    }
}
