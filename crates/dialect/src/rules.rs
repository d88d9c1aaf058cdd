// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Dialect Rules
//!
//! Lexical behavior that differs between dialects, expressed as plain data.
//! The statement scanner never matches on a [`Dialect`](crate::Dialect)
//! directly; it only consults the flags in this table.

use serde::{Deserialize, Serialize};

use crate::dialect::DialectFamily;

/// Quoting, comment and boundary rules for one dialect family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialectRules {
    /// `$tag$ ... $tag$` bodies are literal regions
    pub dollar_quotes: bool,

    /// A line holding only `GO` ends the current batch
    pub batch_separator: bool,

    /// `#` starts a line comment
    ///
    /// Only Generic and the MySQL family. Elsewhere `#` is an operator
    /// (PostgreSQL), a temp-table prefix (SQL Server) or not valid at all, so
    /// treating it as a comment would hide code.
    pub hash_comments: bool,

    /// `--` only opens a comment when followed by whitespace, a control
    /// character or end of input (`1--1` is arithmetic)
    pub dash_comment_needs_space: bool,

    /// Backslash escapes the next character inside string literals
    pub backslash_escapes: bool,

    /// `E'...'` strings, where backslash escapes apply regardless of
    /// `backslash_escapes`
    pub escape_strings: bool,

    /// `` `name` `` is a quoted identifier
    pub backtick_identifiers: bool,

    /// `[name]` is a quoted identifier
    pub bracket_identifiers: bool,

    /// `/* /* */ */` nests
    pub nested_block_comments: bool,

    /// Character used to quote identifiers in generated queries
    pub identifier_quote: char,
}

impl Default for DialectRules {
    fn default() -> Self {
        Self {
            dollar_quotes: false,
            batch_separator: false,
            hash_comments: true,
            dash_comment_needs_space: false,
            backslash_escapes: false,
            escape_strings: false,
            backtick_identifiers: false,
            bracket_identifiers: false,
            nested_block_comments: false,
            identifier_quote: '"',
        }
    }
}

impl DialectRules {
    /// Rules table, one row per family
    pub fn for_family(family: DialectFamily) -> Self {
        let base = Self::default();
        match family {
            DialectFamily::Generic => base,
            DialectFamily::MySQL => Self {
                dash_comment_needs_space: true,
                backslash_escapes: true,
                backtick_identifiers: true,
                identifier_quote: '`',
                ..base
            },
            DialectFamily::PostgreSQL => Self {
                dollar_quotes: true,
                hash_comments: false,
                escape_strings: true,
                nested_block_comments: true,
                ..base
            },
            DialectFamily::SqlServer => Self {
                batch_separator: true,
                hash_comments: false,
                bracket_identifiers: true,
                identifier_quote: '[',
                ..base
            },
            DialectFamily::SQLite => Self {
                hash_comments: false,
                backtick_identifiers: true,
                bracket_identifiers: true,
                ..base
            },
            DialectFamily::Oracle
            | DialectFamily::DB2
            | DialectFamily::Cassandra
            | DialectFamily::Hana => Self {
                hash_comments: false,
                ..base
            },
        }
    }

    /// Closing quote for an identifier opened with `identifier_quote`
    pub fn identifier_close(&self) -> char {
        match self.identifier_quote {
            '[' => ']',
            other => other,
        }
    }
}
