//! Column-usage scanner

use crate::analyzer::guard::is_locally_guarded;
use crate::syntax::{descendants_of_kind, NodeId, SyntaxKind, SyntaxTree};

/// Part of a query a column occurrence is scanned in
///
/// Each scope bounds the upward search for a local null guard by its own set
/// of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// SELECT list
    Select,
    /// Members of the WHERE clause
    Where,
    /// ON conditions of other joins on the same data source
    Join,
}

impl Scope {
    pub fn boundary(&self) -> &'static [SyntaxKind] {
        match self {
            Scope::Select => &[SyntaxKind::SelectedField, SyntaxKind::Expression],
            Scope::Where => &[SyntaxKind::SearchCondition, SyntaxKind::Expression],
            Scope::Join => &[SyntaxKind::JoinPart, SyntaxKind::Expression],
        }
    }
}

/// Columns under `subtree` qualified by `alias` and not locally guarded
pub fn unguarded_columns<'t>(
    tree: &'t SyntaxTree,
    subtree: NodeId,
    alias: &'t str,
    scope: Scope,
) -> impl Iterator<Item = NodeId> + 't {
    descendants_of_kind(tree, subtree, SyntaxKind::Column)
        .filter(move |&column| {
            tree.column_qualifier(column)
                .is_some_and(|qualifier| same_identifier(qualifier, alias))
        })
        .filter(move |&column| !is_locally_guarded(tree, column, scope))
}

/// Case-insensitive identifier comparison (identifiers are not ASCII-only)
pub(crate) fn same_identifier(left: &str, right: &str) -> bool {
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}
