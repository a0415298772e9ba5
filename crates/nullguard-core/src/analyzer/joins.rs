//! Join alias resolver - which aliases an outer join makes nullable

use tracing::debug;

use crate::syntax::{NodeId, SyntaxKind, SyntaxTree};

/// Data sources whose columns may be NULL because of this join part
///
/// LEFT makes the joined source nullable, RIGHT the source the join is
/// attached to, FULL both (attached source first). INNER makes nothing
/// nullable. A RIGHT/FULL join that is not attached to a data source has no
/// attached side to report.
pub fn nullable_data_sources(tree: &SyntaxTree, join_part: NodeId) -> Vec<NodeId> {
    let kind = tree.join_kind(join_part);
    let mut sources = Vec::with_capacity(2);

    if kind.nullifies_enclosing() {
        match tree.parent(join_part) {
            Some(parent) if tree.kind(parent) == SyntaxKind::DataSource => sources.push(parent),
            _ => debug!(join = %join_part, ?kind, "join part has no attached data source"),
        }
    }

    if kind.nullifies_joined() {
        match tree.join_data_source(join_part) {
            Some(source) => sources.push(source),
            None => debug!(join = %join_part, ?kind, "join part has no joined data source"),
        }
    }

    sources
}

/// Aliases of [`nullable_data_sources`]; sources without an alias are skipped
pub fn nullable_aliases(tree: &SyntaxTree, join_part: NodeId) -> Vec<&str> {
    nullable_data_sources(tree, join_part)
        .into_iter()
        .filter_map(|source| tree.alias_name(source))
        .collect()
}
