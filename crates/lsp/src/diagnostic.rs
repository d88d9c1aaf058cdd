// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Diagnostics
//!
//! The splitter never fails: an unterminated literal or comment simply runs
//! to the end of the script and swallows every statement after it. That is
//! rarely what the user meant, so the server reports each such region as a
//! warning starting at its opening delimiter.

use sqltools_dialect::Dialect;
use sqltools_splitter::{QuoteKind, Token, TokenKind, tokenize};
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Range, Url};
use tracing::info;

use crate::SERVER_NAME;
use crate::document::Document;

/// Diagnostic codes reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// String literal or quoted identifier without a closing quote
    UnterminatedLiteral,

    /// Block comment without `*/`
    UnterminatedComment,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::UnterminatedLiteral => "LEX-001",
            DiagnosticCode::UnterminatedComment => "LEX-002",
        }
    }
}

impl From<DiagnosticCode> for NumberOrString {
    fn from(code: DiagnosticCode) -> Self {
        NumberOrString::String(code.as_str().to_string())
    }
}

/// A diagnostic before conversion to the LSP type
#[derive(Debug, Clone, PartialEq)]
pub struct SqlDiagnostic {
    pub message: String,
    pub severity: DiagnosticSeverity,
    pub range: Range,
    pub code: DiagnosticCode,
}

impl SqlDiagnostic {
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, range: Range) -> Self {
        Self {
            message: message.into(),
            severity: DiagnosticSeverity::WARNING,
            range,
            code,
        }
    }

    pub fn to_lsp(&self) -> Diagnostic {
        Diagnostic {
            range: self.range,
            severity: Some(self.severity),
            code: Some(self.code.into()),
            source: Some(SERVER_NAME.to_string()),
            message: self.message.clone(),
            ..Default::default()
        }
    }
}

/// Warnings for every literal or comment left open at end of input
pub fn collect_diagnostics(doc: &Document, dialect: Dialect) -> Vec<SqlDiagnostic> {
    let text = doc.text();

    tokenize(&text, dialect.rules())
        .iter()
        .filter(|token| !token.terminated)
        .filter_map(|token| {
            let (code, message) = describe(token)?;
            let opener = token.span.start..opener_end(&text, token);
            Some(SqlDiagnostic::warning(code, message, doc.range_of(&opener)))
        })
        .collect()
}

/// Collect and publish diagnostics, returning how many were sent
pub async fn publish_diagnostics_for_document(
    client: &tower_lsp::Client,
    uri: Url,
    doc: &Document,
    dialect: Dialect,
) -> usize {
    let diagnostics: Vec<Diagnostic> = collect_diagnostics(doc, dialect)
        .iter()
        .map(SqlDiagnostic::to_lsp)
        .collect();

    let count = diagnostics.len();
    if count > 0 {
        info!("Publishing {} diagnostics for {}", count, uri);
    }

    client
        .publish_diagnostics(uri, diagnostics, Some(doc.version()))
        .await;

    count
}

fn describe(token: &Token) -> Option<(DiagnosticCode, &'static str)> {
    let described = match token.kind {
        TokenKind::Quoted(QuoteKind::Single) => (
            DiagnosticCode::UnterminatedLiteral,
            "Unterminated string literal; the rest of the script is treated as part of it.",
        ),
        TokenKind::Quoted(QuoteKind::Dollar) => (
            DiagnosticCode::UnterminatedLiteral,
            "Unterminated dollar-quoted string; the rest of the script is treated as part of it.",
        ),
        TokenKind::Quoted(_) => (
            DiagnosticCode::UnterminatedLiteral,
            "Unterminated quoted identifier; the rest of the script is treated as part of it.",
        ),
        TokenKind::BlockComment => (
            DiagnosticCode::UnterminatedComment,
            "Unterminated block comment; the rest of the script is commented out.",
        ),
        _ => return None,
    };
    Some(described)
}

/// End of the opening delimiter, so the squiggle stays short
fn opener_end(text: &str, token: &Token) -> usize {
    let body = &text[token.span.clone()];
    let len = match token.kind {
        TokenKind::BlockComment => 2,
        TokenKind::Quoted(QuoteKind::Dollar) => body[1..].find('$').map_or(1, |i| i + 2),
        TokenKind::Quoted(QuoteKind::Single) if body.starts_with(['E', 'e']) => 2,
        _ => body.chars().next().map_or(0, char::len_utf8),
    };
    token.span.start + len.min(body.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_lsp::lsp_types::{Position, Url};

    fn doc(text: &str) -> Document {
        Document::new(
            Url::parse("file:///test.sql").unwrap(),
            text.to_string(),
            1,
            "sql".to_string(),
        )
    }

    #[test]
    fn test_clean_script_has_no_diagnostics() {
        let diagnostics = collect_diagnostics(&doc("SELECT 'a;b';\n/* c */ SELECT 2;"), Dialect::Generic);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unterminated_string() {
        let diagnostics = collect_diagnostics(&doc("SELECT 1;\nSELECT 'oops;\nSELECT 2;"), Dialect::Generic);

        assert_eq!(diagnostics.len(), 1);
        let diagnostic = &diagnostics[0];
        assert_eq!(diagnostic.code, DiagnosticCode::UnterminatedLiteral);
        assert_eq!(diagnostic.severity, DiagnosticSeverity::WARNING);
        assert_eq!(diagnostic.range.start, Position::new(1, 7));
        assert_eq!(diagnostic.range.end, Position::new(1, 8));
    }

    #[test]
    fn test_unterminated_block_comment() {
        let diagnostics = collect_diagnostics(&doc("SELECT 1; /* never closed"), Dialect::Generic);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::UnterminatedComment);
        assert_eq!(diagnostics[0].range.end, Position::new(0, 12));
    }

    #[test]
    fn test_unterminated_dollar_quote_covers_tag() {
        let diagnostics = collect_diagnostics(&doc("SELECT $fn$ body"), Dialect::PostgreSQL);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].range.start, Position::new(0, 7));
        assert_eq!(diagnostics[0].range.end, Position::new(0, 11));
    }

    #[test]
    fn test_unterminated_escape_string_covers_prefix() {
        let diagnostics = collect_diagnostics(&doc("SELECT E'it\\'s"), Dialect::PostgreSQL);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].range.start, Position::new(0, 7));
        assert_eq!(diagnostics[0].range.end, Position::new(0, 9));
    }

    #[test]
    fn test_to_lsp() {
        let diagnostic = collect_diagnostics(&doc("SELECT \"x"), Dialect::Generic)[0].to_lsp();

        assert_eq!(diagnostic.source.as_deref(), Some(SERVER_NAME));
        assert_eq!(diagnostic.code, Some(NumberOrString::String("LEX-001".into())));
    }
}
