//! Syntax tree consumed by the analysis
//!
//! The tree is produced upstream by a parser; this module only models it,
//! builds it from events or from its serialized form, and navigates it.

mod builder;
mod kind;
pub mod navigation;
mod raw;
mod tree;

pub use builder::TreeBuilder;
pub use kind::{JoinKind, SyntaxKind, TokenKind};
pub use navigation::{descendants_of_kind, find_enclosing, Descendants};
pub use raw::{RawDocument, RawNode};
pub use tree::{NodeId, SyntaxNode, SyntaxTree};
