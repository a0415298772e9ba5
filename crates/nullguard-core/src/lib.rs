//! nullguard-core: outer-join null-guard analysis
//!
//! This library inspects already-parsed query trees for columns of outer-joined
//! tables that are used in SELECT, WHERE or other join conditions without a
//! null guard, and reports one finding per offending join.

pub mod analyzer;
pub mod error;
pub mod syntax;

pub use analyzer::{analyze, check_join, Finding, JoinFailure, RelatedLocation, Report};
pub use error::{AnalysisError, DiagnosticKind, Severity, Span, TreeError};
pub use syntax::{
    JoinKind, NodeId, RawDocument, RawNode, SyntaxKind, SyntaxTree, TokenKind, TreeBuilder,
};
