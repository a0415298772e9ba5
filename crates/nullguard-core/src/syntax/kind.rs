//! Node kinds of the query grammar

use serde::{Deserialize, Serialize};

/// Grammar production (or terminal) a syntax node was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyntaxKind {
    /// A complete SELECT query (top level or nested)
    Query,
    /// The SELECT list
    SelectedFields,
    /// One member of the SELECT list
    SelectedField,
    /// The FROM list
    DataSources,
    /// A table (or nested source) with its alias and the joins attached to it
    DataSource,
    /// Table name inside a data source
    Table,
    /// `AS? identifier` after a data source
    Alias,
    /// `<kind> JOIN <data source> ON <conditions>`
    JoinPart,
    /// A list of conditions joined by AND/OR (WHERE, HAVING, ON)
    SearchConditions,
    /// One condition, possibly `NOT`-prefixed or parenthesized
    SearchCondition,
    /// `<expression> IS [NOT] NULL`
    IsNullPredicate,
    Expression,
    BuiltInFunctionCall,
    /// `[qualifier .] field`
    Column,
    Identifier,
    Token(TokenKind),
}

/// Terminal tokens the analysis cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Select,
    From,
    Where,
    Having,
    As,
    On,
    LeftJoin,
    RightJoin,
    FullJoin,
    InnerJoin,
    Join,
    Outer,
    And,
    Or,
    Not,
    Is,
    Null,
    /// The null-coalescing built-in `ISNULL(value, replacement)`
    IsNull,
    Dot,
    Comma,
    LParen,
    RParen,
    Operator,
    Literal,
    Other,
}

/// Join flavour of a join part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinKind {
    Left,
    Right,
    Full,
    Inner,
}

impl JoinKind {
    /// Whether rows of the joined data source may be missing from the result
    pub fn nullifies_joined(&self) -> bool {
        matches!(self, JoinKind::Left | JoinKind::Full)
    }

    /// Whether rows of the data source the join is attached to may be missing
    pub fn nullifies_enclosing(&self) -> bool {
        matches!(self, JoinKind::Right | JoinKind::Full)
    }
}
