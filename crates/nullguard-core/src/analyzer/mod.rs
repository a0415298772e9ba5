//! Outer-join analysis - fields of nullable join sides used without a null guard

mod guard;
mod joins;
mod scanner;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{AnalysisError, DiagnosticKind, Span};
use crate::syntax::{find_enclosing, NodeId, SyntaxKind, SyntaxTree};

pub use guard::{has_blanket_guard, is_locally_guarded};
pub use joins::{nullable_aliases, nullable_data_sources};
pub use scanner::{unguarded_columns, Scope};

/// Tag carried by every related location; the finding itself names the defect
pub const RELATED_TAG: &str = "+1";

/// An unguarded column occurrence reported alongside a join
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedLocation {
    pub node: NodeId,
    pub span: Span,
    pub tag: String,
}

/// One flagged join part with every unguarded occurrence of its nullable aliases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: DiagnosticKind,
    pub join: NodeId,
    pub span: Span,
    pub related: Vec<RelatedLocation>,
}

/// A join check that could not be completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinFailure {
    pub join: NodeId,
    pub error: AnalysisError,
}

/// Result of analyzing every join part of a tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub findings: Vec<Finding>,
    pub failures: Vec<JoinFailure>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty() && self.failures.is_empty()
    }
}

/// Check a single join part
///
/// Returns `Ok(None)` when the join introduces no nullable alias, is not
/// inside a query, is exempted by a null check in the query's WHERE clause,
/// or when every use of its nullable aliases is guarded.
pub fn check_join(
    tree: &SyntaxTree,
    join_part: NodeId,
) -> Result<Option<Finding>, AnalysisError> {
    let kind = tree.node(join_part)?.kind();
    if kind != SyntaxKind::JoinPart {
        return Err(AnalysisError::NotAJoinPart {
            node: join_part,
            kind,
        });
    }

    let aliases = nullable_aliases(tree, join_part);
    if aliases.is_empty() {
        return Ok(None);
    }

    let Some(query) = find_enclosing(tree, join_part, &[SyntaxKind::Query]) else {
        debug!(join = %join_part, "join part outside of a query");
        return Ok(None);
    };

    if let Some(where_clause) = tree.where_clause(query) {
        if has_blanket_guard(tree, where_clause) {
            debug!(join = %join_part, ?aliases, "null check in WHERE exempts join");
            return Ok(None);
        }
    }

    let mut occurrences = IndexSet::new();
    for alias in &aliases {
        collect_occurrences(tree, query, join_part, alias, &mut occurrences);
    }

    if occurrences.is_empty() {
        debug!(join = %join_part, ?aliases, "all nullable fields guarded");
        return Ok(None);
    }

    debug!(join = %join_part, ?aliases, count = occurrences.len(), "unguarded nullable fields");
    let related = occurrences
        .into_iter()
        .map(|node| RelatedLocation {
            node,
            span: tree.span(node),
            tag: RELATED_TAG.to_string(),
        })
        .collect();

    Ok(Some(Finding {
        kind: DiagnosticKind::UnguardedOuterJoinField,
        join: join_part,
        span: tree.span(join_part),
        related,
    }))
}

fn collect_occurrences(
    tree: &SyntaxTree,
    query: NodeId,
    join_part: NodeId,
    alias: &str,
    occurrences: &mut IndexSet<NodeId>,
) {
    let mut record = |column: NodeId, scope: Scope| {
        trace!(join = %join_part, column = %column, ?scope, alias, "unguarded occurrence");
        occurrences.insert(column);
    };

    if let Some(fields) = tree.selected_fields(query) {
        for column in unguarded_columns(tree, fields, alias, Scope::Select) {
            record(column, Scope::Select);
        }
    }

    if let Some(where_clause) = tree.where_clause(query) {
        for condition in tree.conditions(where_clause) {
            for column in unguarded_columns(tree, condition, alias, Scope::Where) {
                record(column, Scope::Where);
            }
        }
    }

    // A join's own ON condition legitimately tests the columns it introduces.
    if let Some(source) = find_enclosing(tree, join_part, &[SyntaxKind::DataSource]) {
        let siblings = tree.join_parts(source).filter(|&other| other != join_part);
        for condition in siblings.filter_map(|other| tree.join_condition(other)) {
            for column in unguarded_columns(tree, condition, alias, Scope::Join) {
                record(column, Scope::Join);
            }
        }
    }
}

/// Check every join part of a tree in document order
///
/// A failing join is recorded in [`Report::failures`] and does not affect the
/// checks of other joins. A tree that passed [`SyntaxTree::from_raw`] or
/// [`TreeBuilder`](crate::syntax::TreeBuilder) never makes the check of one of
/// its own join parts fail, since malformed join shapes fail closed as "no
/// nullable alias". The only errors [`check_join`] returns are for ids that are
/// not join parts of the tree, which only direct callers can pass.
pub fn analyze(tree: &SyntaxTree) -> Report {
    let mut report = Report::default();

    for join_part in tree.ids().filter(|&id| tree.kind(id) == SyntaxKind::JoinPart) {
        match check_join(tree, join_part) {
            Ok(Some(finding)) => report.findings.push(finding),
            Ok(None) => {}
            Err(error) => {
                warn!(join = %join_part, %error, "join check failed");
                report.failures.push(JoinFailure {
                    join: join_part,
                    error,
                });
            }
        }
    }

    report
}
