// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Query Parameters
//!
//! Finds bind placeholders so the editor can prompt for values before a
//! query runs. Only code regions are searched; placeholders inside literals,
//! quoted identifiers and comments are ignored.
//!
//! | style     | dialects                              |
//! |-----------|---------------------------------------|
//! | `$1`      | PostgreSQL family, Generic, SQLite    |
//! | `?`       | everything but PostgreSQL family      |
//! | `:name`   | all                                   |
//! | `@name`   | SQL Server, SQLite, Generic           |
//! | `$name`   | SQLite                                |

use std::collections::HashSet;
use std::ops::Range;

use serde::Serialize;
use sqltools_dialect::{Dialect, DialectFamily};

use crate::scanner::{Scanner, TokenKind, is_ident_byte};

/// Placeholder style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParameterKind {
    /// `?`, numbered by occurrence starting at 1
    Positional(u32),
    /// `$1`
    Numbered(u32),
    /// `:name`, `@name`, `$name`
    Named,
}

/// A placeholder found in a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryParameter {
    pub kind: ParameterKind,

    /// Placeholder as written, e.g. `$1` or `:id`
    pub name: String,

    /// Byte range of the first occurrence
    pub range: Range<usize>,
}

#[derive(Debug, Clone, Copy)]
struct ParamStyles {
    question: bool,
    numbered: bool,
    at_named: bool,
    dollar_named: bool,
}

impl ParamStyles {
    fn for_family(family: DialectFamily) -> Self {
        match family {
            DialectFamily::PostgreSQL => Self {
                question: false,
                numbered: true,
                at_named: false,
                dollar_named: false,
            },
            DialectFamily::SqlServer => Self {
                question: true,
                numbered: false,
                at_named: true,
                dollar_named: false,
            },
            DialectFamily::SQLite => Self {
                question: true,
                numbered: true,
                at_named: true,
                dollar_named: true,
            },
            DialectFamily::Generic => Self {
                question: true,
                numbered: true,
                at_named: true,
                dollar_named: false,
            },
            _ => Self {
                question: true,
                numbered: false,
                at_named: false,
                dollar_named: false,
            },
        }
    }
}

/// Placeholders in `script`, named ones deduplicated in first-seen order
pub fn query_parameters(script: &str, dialect: Dialect) -> Vec<QueryParameter> {
    let styles = ParamStyles::for_family(dialect.family());
    let bytes = script.as_bytes();
    let mut found = Vec::new();
    let mut seen = HashSet::new();
    let mut question_count = 0u32;

    for token in Scanner::new(script, dialect.rules()) {
        if token.kind != TokenKind::Code {
            continue;
        }

        let mut at = token.span.start;
        while at < token.span.end {
            let prev = (at > 0).then(|| bytes[at - 1]);
            let after_ident = prev.is_some_and(is_ident_byte);
            let next = bytes.get(at + 1).copied();

            let hit = match bytes[at] {
                b'?' if styles.question => {
                    question_count += 1;
                    Some((ParameterKind::Positional(question_count), at + 1))
                }
                b'$' if !after_ident && next.is_some_and(|b| b.is_ascii_digit()) => {
                    let end = scan_while(bytes, at + 1, token.span.end, |b| b.is_ascii_digit());
                    if styles.numbered {
                        script[at + 1..end]
                            .parse()
                            .ok()
                            .map(|n| (ParameterKind::Numbered(n), end))
                    } else {
                        at = end;
                        continue;
                    }
                }
                b'$' if styles.dollar_named && !after_ident && next.is_some_and(is_name_start) => {
                    named(bytes, at, token.span.end)
                }
                b':' if prev != Some(b':')
                    && !after_ident
                    && next.is_some_and(is_name_start) =>
                {
                    named(bytes, at, token.span.end)
                }
                b'@' if styles.at_named
                    && prev != Some(b'@')
                    && !after_ident
                    && next.is_some_and(is_name_start) =>
                {
                    named(bytes, at, token.span.end)
                }
                _ => None,
            };

            match hit {
                Some((kind, end)) => {
                    let name = &script[at..end];
                    let unique = matches!(kind, ParameterKind::Positional(_))
                        || seen.insert(name.to_string());
                    if unique {
                        found.push(QueryParameter {
                            kind,
                            name: name.to_string(),
                            range: at..end,
                        });
                    }
                    at = end;
                }
                None => at += 1,
            }
        }
    }

    found
}

fn named(bytes: &[u8], at: usize, limit: usize) -> Option<(ParameterKind, usize)> {
    let end = scan_while(bytes, at + 1, limit, |b| b.is_ascii_alphanumeric() || b == b'_');
    Some((ParameterKind::Named, end))
}

fn scan_while(bytes: &[u8], from: usize, limit: usize, pred: impl Fn(u8) -> bool) -> usize {
    let mut end = from;
    while end < limit && pred(bytes[end]) {
        end += 1;
    }
    end
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}
