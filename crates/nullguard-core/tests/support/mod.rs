#![allow(dead_code)]

//! Fixture trees for the integration tests.
//!
//! A deliberately small recursive-descent reader for the query subset the
//! tests use. It emits the same tree shapes the upstream parser does:
//!
//! - `Query[SELECT SelectedFields FROM DataSources (WHERE SearchConditions)?
//!   (HAVING SearchConditions)?]`
//! - `DataSource[Table|( Query ), Alias?, JoinPart*]`, joins attached to the
//!   leftmost source of a FROM member
//! - `JoinPart[kind token?, OUTER?, JOIN, DataSource, ON, SearchConditions]`
//! - `SearchCondition[NOT ( SearchConditions )]`, `[( SearchConditions )]`,
//!   `[NOT? IsNullPredicate]` or `[NOT? Expression op Expression]`
//! - `IsNullPredicate[Expression, IS, NOT?, NULL]`
//! - `BuiltInFunctionCall[ISNULL ( Expression , Expression )]`

use nullguard_core::syntax::{SyntaxTree, TokenKind, TreeBuilder};
use nullguard_core::{analyze, Finding, NodeId, Span, SyntaxKind};

const RESERVED: &[&str] = &[
    "SELECT", "FROM", "WHERE", "HAVING", "AS", "ON", "LEFT", "RIGHT", "FULL", "INNER", "OUTER",
    "JOIN", "AND", "OR", "NOT", "IS", "NULL", "ISNULL",
];

const COMPARISONS: &[&str] = &["=", "<>", "<", ">", "<=", ">="];
const ARITHMETIC: &[&str] = &["+", "-", "*", "/"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Word,
    Number,
    Str,
    Punct,
}

#[derive(Debug, Clone)]
struct Lexeme {
    class: Class,
    text: String,
    span: Span,
}

fn lex(sql: &str) -> Vec<Lexeme> {
    let chars: Vec<(usize, char)> = sql.char_indices().collect();
    let mut lexemes = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (start, c) = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        let class = if c.is_alphabetic() || c == '_' {
            while j < chars.len() && (chars[j].1.is_alphanumeric() || chars[j].1 == '_') {
                j += 1;
            }
            Class::Word
        } else if c.is_ascii_digit() {
            while j < chars.len() && chars[j].1.is_ascii_digit() {
                j += 1;
            }
            Class::Number
        } else if c == '\'' {
            while j < chars.len() && chars[j].1 != '\'' {
                j += 1;
            }
            j = (j + 1).min(chars.len());
            Class::Str
        } else {
            if (c == '<' || c == '>') && j < chars.len() && matches!(chars[j].1, '=' | '>') {
                j += 1;
            }
            Class::Punct
        };

        let end = chars.get(j).map(|&(offset, _)| offset).unwrap_or(sql.len());
        lexemes.push(Lexeme {
            class,
            text: sql[start..end].to_string(),
            span: Span::new(start, end - start),
        });
        i = j;
    }

    lexemes
}

struct Reader {
    lexemes: Vec<Lexeme>,
    pos: usize,
    builder: TreeBuilder,
}

impl Reader {
    fn peek_at(&self, offset: usize) -> Option<&Lexeme> {
        self.lexemes.get(self.pos + offset)
    }

    fn is_keyword_at(&self, offset: usize, keyword: &str) -> bool {
        self.peek_at(offset)
            .is_some_and(|l| l.class == Class::Word && l.text.eq_ignore_ascii_case(keyword))
    }

    fn is_keyword(&self, keyword: &str) -> bool {
        self.is_keyword_at(0, keyword)
    }

    fn is_punct_at(&self, offset: usize, punct: &str) -> bool {
        self.peek_at(offset)
            .is_some_and(|l| l.class == Class::Punct && l.text == punct)
    }

    fn is_punct(&self, punct: &str) -> bool {
        self.is_punct_at(0, punct)
    }

    fn is_one_of(&self, puncts: &[&str]) -> bool {
        puncts.iter().any(|p| self.is_punct(p))
    }

    fn is_plain_word(&self) -> bool {
        self.peek_at(0).is_some_and(|l| {
            l.class == Class::Word && !RESERVED.iter().any(|r| l.text.eq_ignore_ascii_case(r))
        })
    }

    fn bump(&mut self) -> Lexeme {
        let lexeme = self
            .lexemes
            .get(self.pos)
            .cloned()
            .unwrap_or_else(|| panic!("unexpected end of fixture at lexeme {}", self.pos));
        self.pos += 1;
        lexeme
    }

    fn token(&mut self, kind: TokenKind) {
        let lexeme = self.bump();
        self.builder.token(kind, lexeme.text, lexeme.span);
    }

    fn expect_keyword(&mut self, keyword: &str, kind: TokenKind) {
        assert!(self.is_keyword(keyword), "expected {keyword} at lexeme {}", self.pos);
        self.token(kind);
    }

    fn expect_punct(&mut self, punct: &str, kind: TokenKind) {
        assert!(self.is_punct(punct), "expected `{punct}` at lexeme {}", self.pos);
        self.token(kind);
    }

    fn ident(&mut self) {
        let lexeme = self.bump();
        assert_eq!(lexeme.class, Class::Word, "expected identifier, got {:?}", lexeme.text);
        self.builder.ident(lexeme.text, lexeme.span);
    }

    fn start(&mut self, kind: SyntaxKind) -> NodeId {
        self.builder.start_node(kind)
    }

    fn finish(&mut self) -> NodeId {
        self.builder.finish_node().expect("fixture nodes are balanced")
    }

    fn query(&mut self) -> NodeId {
        self.start(SyntaxKind::Query);
        self.expect_keyword("SELECT", TokenKind::Select);
        self.selected_fields();
        self.expect_keyword("FROM", TokenKind::From);
        self.data_sources();
        if self.is_keyword("WHERE") {
            self.token(TokenKind::Where);
            self.search_conditions();
        }
        if self.is_keyword("HAVING") {
            self.token(TokenKind::Having);
            self.search_conditions();
        }
        self.finish()
    }

    fn selected_fields(&mut self) {
        self.start(SyntaxKind::SelectedFields);
        loop {
            self.start(SyntaxKind::SelectedField);
            self.expression();
            if self.is_keyword("AS") {
                self.start(SyntaxKind::Alias);
                self.token(TokenKind::As);
                self.ident();
                self.finish();
            }
            self.finish();
            if !self.is_punct(",") {
                break;
            }
            self.token(TokenKind::Comma);
        }
        self.finish();
    }

    fn data_sources(&mut self) {
        self.start(SyntaxKind::DataSources);
        loop {
            self.data_source(true);
            if !self.is_punct(",") {
                break;
            }
            self.token(TokenKind::Comma);
        }
        self.finish();
    }

    fn data_source(&mut self, with_joins: bool) {
        self.start(SyntaxKind::DataSource);
        if self.is_punct("(") {
            self.token(TokenKind::LParen);
            self.query();
            self.expect_punct(")", TokenKind::RParen);
        } else {
            self.start(SyntaxKind::Table);
            self.ident();
            self.finish();
        }

        if self.is_keyword("AS") {
            self.start(SyntaxKind::Alias);
            self.token(TokenKind::As);
            self.ident();
            self.finish();
        } else if self.is_plain_word() {
            self.start(SyntaxKind::Alias);
            self.ident();
            self.finish();
        }

        if with_joins {
            while ["LEFT", "RIGHT", "FULL", "INNER", "JOIN"]
                .iter()
                .any(|k| self.is_keyword(k))
            {
                self.join_part();
            }
        }
        self.finish();
    }

    fn join_part(&mut self) {
        self.start(SyntaxKind::JoinPart);
        if self.is_keyword("LEFT") {
            self.token(TokenKind::LeftJoin);
        } else if self.is_keyword("RIGHT") {
            self.token(TokenKind::RightJoin);
        } else if self.is_keyword("FULL") {
            self.token(TokenKind::FullJoin);
        } else if self.is_keyword("INNER") {
            self.token(TokenKind::InnerJoin);
        }
        if self.is_keyword("OUTER") {
            self.token(TokenKind::Outer);
        }
        self.expect_keyword("JOIN", TokenKind::Join);
        self.data_source(false);
        self.expect_keyword("ON", TokenKind::On);
        self.search_conditions();
        self.finish();
    }

    fn search_conditions(&mut self) {
        self.start(SyntaxKind::SearchConditions);
        self.search_condition();
        loop {
            if self.is_keyword("AND") {
                self.token(TokenKind::And);
            } else if self.is_keyword("OR") {
                self.token(TokenKind::Or);
            } else {
                break;
            }
            self.search_condition();
        }
        self.finish();
    }

    fn search_condition(&mut self) {
        self.start(SyntaxKind::SearchCondition);
        if self.is_keyword("NOT") && self.is_punct_at(1, "(") {
            self.token(TokenKind::Not);
            self.token(TokenKind::LParen);
            self.search_conditions();
            self.expect_punct(")", TokenKind::RParen);
        } else if self.is_punct("(") {
            self.token(TokenKind::LParen);
            self.search_conditions();
            self.expect_punct(")", TokenKind::RParen);
        } else {
            if self.is_keyword("NOT") {
                self.token(TokenKind::Not);
            }
            self.predicate();
        }
        self.finish();
    }

    /// Whether the predicate starting here is `<expr> IS [NOT] NULL`
    fn is_null_check_ahead(&self) -> bool {
        let mut depth = 0usize;
        let mut offset = 0;
        while let Some(lexeme) = self.peek_at(offset) {
            match (lexeme.class, lexeme.text.as_str()) {
                (Class::Punct, "(") => depth += 1,
                (Class::Punct, ")") if depth == 0 => return false,
                (Class::Punct, ")") => depth -= 1,
                (Class::Word, word) if depth == 0 && word.eq_ignore_ascii_case("IS") => {
                    return true
                }
                (Class::Word, word)
                    if depth == 0
                        && !word.eq_ignore_ascii_case("ISNULL")
                        && RESERVED.iter().any(|r| word.eq_ignore_ascii_case(r)) =>
                {
                    return false
                }
                (Class::Punct, punct)
                    if depth == 0 && COMPARISONS.iter().any(|c| *c == punct) =>
                {
                    return false
                }
                _ => {}
            }
            offset += 1;
        }
        false
    }

    fn predicate(&mut self) {
        if self.is_null_check_ahead() {
            self.start(SyntaxKind::IsNullPredicate);
            self.expression();
            self.expect_keyword("IS", TokenKind::Is);
            if self.is_keyword("NOT") {
                self.token(TokenKind::Not);
            }
            self.expect_keyword("NULL", TokenKind::Null);
            self.finish();
        } else {
            self.expression();
            if self.is_one_of(COMPARISONS) {
                self.token(TokenKind::Operator);
                self.expression();
            }
        }
    }

    fn expression(&mut self) {
        self.start(SyntaxKind::Expression);
        self.term();
        while self.is_one_of(ARITHMETIC) {
            self.token(TokenKind::Operator);
            self.term();
        }
        self.finish();
    }

    fn term(&mut self) {
        if self.is_keyword("ISNULL") {
            self.start(SyntaxKind::BuiltInFunctionCall);
            self.token(TokenKind::IsNull);
            self.expect_punct("(", TokenKind::LParen);
            self.expression();
            self.expect_punct(",", TokenKind::Comma);
            self.expression();
            self.expect_punct(")", TokenKind::RParen);
            self.finish();
        } else if self.is_keyword("NULL") {
            self.token(TokenKind::Null);
        } else if self.is_plain_word() && self.is_punct_at(1, "(") {
            self.start(SyntaxKind::BuiltInFunctionCall);
            self.token(TokenKind::Other);
            self.token(TokenKind::LParen);
            self.expression();
            while self.is_punct(",") {
                self.token(TokenKind::Comma);
                self.expression();
            }
            self.expect_punct(")", TokenKind::RParen);
            self.finish();
        } else if self.is_plain_word() {
            self.start(SyntaxKind::Column);
            self.ident();
            if self.is_punct(".") {
                self.token(TokenKind::Dot);
                self.ident();
            }
            self.finish();
        } else if self.is_punct("(") {
            self.token(TokenKind::LParen);
            if self.is_keyword("SELECT") {
                self.query();
            } else {
                self.expression();
            }
            self.expect_punct(")", TokenKind::RParen);
        } else {
            match self.peek_at(0).map(|l| l.class) {
                Some(Class::Number) | Some(Class::Str) => self.token(TokenKind::Literal),
                _ => panic!("unexpected lexeme {:?} in expression", self.peek_at(0)),
            }
        }
    }
}

/// Read `;`-separated queries into one tree, one root per query
pub fn parse(sql: &str) -> SyntaxTree {
    let mut reader = Reader {
        lexemes: lex(sql),
        pos: 0,
        builder: TreeBuilder::new(),
    };
    while reader.peek_at(0).is_some() {
        reader.query();
        if reader.is_punct(";") {
            reader.bump();
        }
    }
    reader.builder.finish().expect("fixture tree is complete")
}

/// Findings for `sql`; the fixture trees never make a join check fail
pub fn findings(sql: &str) -> (SyntaxTree, Vec<Finding>) {
    let tree = parse(sql);
    let report = analyze(&tree);
    assert!(report.failures.is_empty(), "unexpected failures: {:?}", report.failures);
    (tree, report.findings)
}

/// Related locations of each finding, as column text
pub fn related_columns(sql: &str) -> Vec<Vec<String>> {
    let (tree, findings) = findings(sql);
    findings
        .iter()
        .map(|finding| {
            finding
                .related
                .iter()
                .map(|location| tree.leaf_text(location.node))
                .collect()
        })
        .collect()
}

/// Source text covered by a span
pub fn source_text(sql: &str, span: Span) -> &str {
    &sql[span.offset..span.end()]
}
