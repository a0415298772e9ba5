//! Null-guard detector
//!
//! Two shape-based heuristics decide whether a nullable column is protected:
//! a whole-clause witness in WHERE (`IS NOT NULL` or a negated `IS NULL`
//! anywhere in it) and a local `ISNULL(...)` wrapper around a single
//! occurrence. Neither evaluates the predicate; both only look at tree shape.

use crate::analyzer::Scope;
use crate::syntax::{
    descendants_of_kind, find_enclosing, NodeId, SyntaxKind, SyntaxTree, TokenKind,
};

/// `<expr> IS NOT NULL`
const IS_NOT_NULL_MEMBERS: usize = 4;
/// `NOT <expr> IS NULL`
const NOT_PREFIX_MEMBERS: usize = 2;
/// `NOT ( <conditions> )`
const NOT_WITH_PARENS_MEMBERS: usize = 4;

const NEGATION_BOUNDARY: &[SyntaxKind] = &[SyntaxKind::SearchCondition, SyntaxKind::Query];

/// Whether a WHERE clause contains any null-check witness
///
/// A single witness exempts the whole clause, whichever column it tests.
pub fn has_blanket_guard(tree: &SyntaxTree, where_clause: NodeId) -> bool {
    descendants_of_kind(tree, where_clause, SyntaxKind::IsNullPredicate)
        .any(|predicate| is_not_null(tree, predicate) || is_negated(tree, predicate))
}

fn is_not_null(tree: &SyntaxTree, predicate: NodeId) -> bool {
    tree.children(predicate).len() == IS_NOT_NULL_MEMBERS
}

fn is_negated(tree: &SyntaxTree, predicate: NodeId) -> bool {
    let Some(owner) = tree.parent(predicate) else {
        return false;
    };
    if tree.kind(owner) == SyntaxKind::SearchCondition
        && starts_with_not(tree, owner, NOT_PREFIX_MEMBERS)
    {
        return true;
    }
    match find_enclosing(tree, owner, NEGATION_BOUNDARY) {
        Some(outer) if tree.kind(outer) == SyntaxKind::SearchCondition => {
            starts_with_not(tree, outer, NOT_WITH_PARENS_MEMBERS)
        }
        _ => false,
    }
}

fn starts_with_not(tree: &SyntaxTree, condition: NodeId, members: usize) -> bool {
    let children = tree.children(condition);
    children.len() == members && tree.is_token(children[0], TokenKind::Not)
}

/// Whether a column occurrence sits inside a null-coalescing call
///
/// Climbs from enclosing boundary node to enclosing boundary node of `scope`,
/// testing the node reached at each step. The climb crosses query boundaries,
/// so a call wrapping a whole subquery guards the columns inside it. It ends
/// unguarded at the root or at an empty boundary node.
pub fn is_locally_guarded(tree: &SyntaxTree, column: NodeId, scope: Scope) -> bool {
    let boundary = scope.boundary();
    let mut current = column;
    loop {
        let Some(enclosing) = find_enclosing(tree, current, boundary) else {
            return false;
        };
        if tree.children(enclosing).is_empty() {
            return false;
        }
        if tree.is_null_coalescing_call(current) {
            return true;
        }
        match tree.parent(enclosing) {
            Some(parent) => current = parent,
            None => return false,
        }
    }
}
