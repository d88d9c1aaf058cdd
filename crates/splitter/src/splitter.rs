// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Statement Splitter
//!
//! Turns a script into its top-level statements. Boundaries are `;`,
//! `GO` lines (SQL Server) and `-- @block` markers, and only count when the
//! [`Scanner`] reports them outside literals and comments.
//!
//! ## Example
//!
//! ```
//! use sqltools_dialect::Dialect;
//! use sqltools_splitter::StatementSplitter;
//!
//! let splitter = StatementSplitter::new(Dialect::Generic);
//! let statements = splitter.split("SELECT ';' FROM t; SELECT 2;");
//! assert_eq!(statements, vec!["SELECT ';' FROM t", "SELECT 2"]);
//! ```

use std::ops::Range;

use serde::Serialize;
use sqltools_dialect::{Dialect, DialectRules};
use tracing::{debug, trace};

use crate::scanner::{Scanner, TokenKind, block_marker_name};

/// One top-level statement of a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    /// Position among the statements of the script
    pub index: usize,

    /// Statement text, trimmed, never empty
    pub text: String,

    /// Byte range of `text` in the script
    pub range: Range<usize>,

    /// Name of the enclosing `@block`, if any
    pub block: Option<String>,
}

impl Statement {
    /// True if `offset` falls inside this statement, end inclusive
    pub fn contains(&self, offset: usize) -> bool {
        self.range.start <= offset && offset <= self.range.end
    }
}

/// Splits scripts according to one dialect's rules
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementSplitter {
    dialect: Dialect,
    rules: DialectRules,
}

impl StatementSplitter {
    /// Create a splitter for `dialect`
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            rules: dialect.rules(),
        }
    }

    /// Create a splitter with an explicit rule set
    pub fn with_rules(dialect: Dialect, rules: DialectRules) -> Self {
        Self { dialect, rules }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn rules(&self) -> DialectRules {
        self.rules
    }

    /// Statement texts in script order
    pub fn split(&self, script: &str) -> Vec<String> {
        self.split_statements(script)
            .into_iter()
            .map(|statement| statement.text)
            .collect()
    }

    /// Statements with their byte ranges and block names
    pub fn split_statements(&self, script: &str) -> Vec<Statement> {
        let mut builder = StatementBuilder::new(script);

        for token in Scanner::new(script, self.rules) {
            match token.kind {
                TokenKind::Semicolon | TokenKind::BatchSeparator => {
                    builder.close(token.span);
                }
                TokenKind::BlockMarker => {
                    let name = block_marker_name(token.text(script))
                        .filter(|name| !name.is_empty())
                        .map(str::to_string);
                    builder.close(token.span);
                    builder.block = name;
                }
                TokenKind::Code => {
                    if !token.text(script).trim().is_empty() {
                        builder.has_code = true;
                    }
                }
                TokenKind::Quoted(_) => {
                    if !token.terminated {
                        trace!(start = token.span.start, "unterminated literal runs to end of script");
                    }
                    builder.has_code = true;
                }
                TokenKind::LineComment | TokenKind::BlockComment => {}
            }
        }

        let statements = builder.finish();
        debug!(
            dialect = %self.dialect,
            count = statements.len(),
            "split script into statements"
        );
        statements
    }

    /// Statement under the cursor at byte `offset`
    ///
    /// Falls back to the nearest preceding statement when the cursor sits
    /// between statements, then to the first following one.
    pub fn statement_at(&self, script: &str, offset: usize) -> Option<Statement> {
        let mut preceding = None;
        for statement in self.split_statements(script) {
            if statement.contains(offset) {
                return Some(statement);
            }
            if statement.range.end < offset {
                preceding = Some(statement);
            } else {
                return preceding.or(Some(statement));
            }
        }
        preceding
    }
}

/// Accumulates the current segment between boundaries
struct StatementBuilder<'a> {
    script: &'a str,
    start: usize,
    has_code: bool,
    block: Option<String>,
    statements: Vec<Statement>,
}

impl<'a> StatementBuilder<'a> {
    fn new(script: &'a str) -> Self {
        Self {
            script,
            start: 0,
            has_code: false,
            block: None,
            statements: Vec::new(),
        }
    }

    /// Close the segment ending where `boundary` starts
    fn close(&mut self, boundary: Range<usize>) {
        self.push(self.start..boundary.start);
        self.start = boundary.end;
        self.has_code = false;
    }

    fn push(&mut self, segment: Range<usize>) {
        // Whitespace and comments alone are not a statement
        if !self.has_code {
            return;
        }

        let raw = &self.script[segment.clone()];
        let text = raw.trim();
        let start = segment.start + (raw.len() - raw.trim_start().len());

        self.statements.push(Statement {
            index: self.statements.len(),
            text: text.to_string(),
            range: start..start + text.len(),
            block: self.block.clone(),
        });
    }

    fn finish(mut self) -> Vec<Statement> {
        self.push(self.start..self.script.len());
        self.statements
    }
}

/// Split `script` into statement texts
pub fn split(script: &str, dialect: Dialect) -> Vec<String> {
    StatementSplitter::new(dialect).split(script)
}

/// Split `script` into statements with ranges
pub fn split_statements(script: &str, dialect: Dialect) -> Vec<Statement> {
    StatementSplitter::new(dialect).split_statements(script)
}

/// Statement under the cursor at byte `offset`
pub fn statement_at(script: &str, dialect: Dialect, offset: usize) -> Option<Statement> {
    StatementSplitter::new(dialect).statement_at(script, offset)
}
