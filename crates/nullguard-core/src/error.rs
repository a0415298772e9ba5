//! Error and diagnostic types

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::syntax::{NodeId, SyntaxKind};

/// Source location span
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset from start of source
    pub offset: usize,
    /// Length in bytes
    pub length: usize,
    /// Line number (1-indexed, 0 when unknown)
    #[serde(default)]
    pub line: usize,
    /// Column number (1-indexed, 0 when unknown)
    #[serde(default)]
    pub column: usize,
}

impl Span {
    /// Create a span with byte offset only
    pub fn new(offset: usize, length: usize) -> Self {
        Self {
            offset,
            length,
            line: 0,
            column: 0,
        }
    }

    /// Create a span with line and column information
    pub fn with_location(offset: usize, length: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            length,
            line,
            column,
        }
    }

    /// End offset (exclusive)
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }

    /// Smallest span covering both `self` and `other`.
    ///
    /// Line/column information is taken from whichever span starts first.
    pub fn cover(self, other: Span) -> Span {
        let first = if other.offset < self.offset {
            other
        } else {
            self
        };
        let end = self.end().max(other.end());
        Span {
            offset: first.offset,
            length: end - first.offset,
            line: first.line,
            column: first.column,
        }
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Types of diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// E0001: Field of an outer-joined table used without a null guard
    UnguardedOuterJoinField,
    /// E1000: A join check could not be completed
    AnalysisFailed,
}

impl DiagnosticKind {
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::UnguardedOuterJoinField => "E0001",
            DiagnosticKind::AnalysisFailed => "E1000",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DiagnosticKind::UnguardedOuterJoinField => "unguarded-outer-join-field",
            DiagnosticKind::AnalysisFailed => "analysis-failed",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::UnguardedOuterJoinField => Severity::Error,
            DiagnosticKind::AnalysisFailed => Severity::Warning,
        }
    }
}

/// Errors raised while building or loading a syntax tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node {0} does not exist in this tree")]
    UnknownNode(NodeId),

    #[error("finish_node called with no open node")]
    NoOpenNode,

    #[error("{0} node(s) left open when the tree was finished")]
    UnclosedNodes(usize),

    #[error("leaf text given to non-leaf kind {0:?}")]
    TextOnInnerNode(SyntaxKind),

    #[error("children given to leaf kind {0:?}")]
    ChildrenOnLeaf(SyntaxKind),
}

/// Errors raised by a single join check
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("node {node} is a {kind:?}, expected a JoinPart")]
    NotAJoinPart { node: NodeId, kind: SyntaxKind },

    #[error(transparent)]
    Tree(#[from] TreeError),
}
