// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Query Clean-up
//!
//! Produces a one-line rendition of a query for history entries and result
//! labels. Comments are removed lexically, so `--` inside a literal survives.
//! The output is for display; literals spanning lines get joined too.

use sqltools_dialect::Dialect;

use crate::scanner::{Scanner, TokenKind};

/// Strip comments and collapse `script` onto one line
pub fn clean_up(script: &str, dialect: Dialect) -> String {
    let mut stripped = String::with_capacity(script.len());
    // A removed block comment still separates the tokens around it
    let mut gap = false;
    for token in Scanner::new(script, dialect.rules()) {
        match token.kind {
            TokenKind::LineComment | TokenKind::BlockMarker => {}
            TokenKind::BlockComment => gap = true,
            _ => {
                let mut text = token.text(script);
                if gap {
                    if stripped.is_empty() || stripped.ends_with(char::is_whitespace) {
                        text = text.trim_start_matches([' ', '\t']);
                    } else if !text.starts_with(char::is_whitespace) {
                        stripped.push(' ');
                    }
                    gap = false;
                }
                stripped.push_str(text);
            }
        }
    }

    stripped
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_up() {
        let script = "-- header\nSELECT a, /* inline */ b\n  FROM t -- trailing\n\nWHERE x = '--keep'";
        assert_eq!(
            clean_up(script, Dialect::Generic),
            "SELECT a, b FROM t WHERE x = '--keep'"
        );
    }

    #[test]
    fn test_clean_up_empty() {
        assert_eq!(clean_up("  -- nothing\n", Dialect::Generic), "");
    }
}
