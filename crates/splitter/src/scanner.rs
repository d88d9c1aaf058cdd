// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Lexical Scanner
//!
//! Single left-to-right pass over a script that classifies every byte into
//! a [`Token`]. The scanner knows nothing about statements; it only answers
//! "is this region code, a literal, a comment or a boundary?".
//!
//! ## States
//!
//! ```text
//! Normal ──'──→ InSingleQuote ──'──→ Normal     ('' stays inside)
//!        ─E'──→ InEscapeString ─'──→ Normal     (\' stays inside)
//!        ──"──→ InDoubleQuote ──"──→ Normal     ("" stays inside)
//!        ──`──→ InBacktick    ──`──→ Normal
//!        ──[──→ InBracket     ──]──→ Normal
//!        ─$t$─→ InDollarQuote ─$t$─→ Normal
//!        ──--─→ InLineComment ──\n─→ Normal     (MySQL: `-- ` only)
//!        ──/*─→ InBlockComment ─*/─→ Normal     (depth counted when nested)
//! ```
//!
//! Which transitions exist is decided by [`DialectRules`]. An unterminated
//! literal or comment runs to the end of input and is reported with
//! `terminated == false`; the scanner never fails.

use std::ops::Range;

use serde::Serialize;
use sqltools_dialect::DialectRules;

/// Marker that turns a line comment into a block boundary
pub const BLOCK_MARKER: &str = "@block";

/// Kind of quoted region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuoteKind {
    /// `'text'`
    Single,
    /// `"text"`
    Double,
    /// `` `text` ``
    Backtick,
    /// `[text]`
    Bracket,
    /// `$tag$ text $tag$`
    Dollar,
}

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// Anything outside literals, comments and boundaries
    Code,
    /// A literal or quoted identifier, delimiters included
    Quoted(QuoteKind),
    /// `-- ...` or `# ...`, without the trailing newline
    LineComment,
    /// `/* ... */`
    BlockComment,
    /// `;`
    Semicolon,
    /// A line holding only `GO`
    BatchSeparator,
    /// A `-- @block` line comment
    BlockMarker,
}

impl TokenKind {
    /// Comments, including block markers
    pub fn is_comment(self) -> bool {
        matches!(
            self,
            TokenKind::LineComment | TokenKind::BlockComment | TokenKind::BlockMarker
        )
    }

    /// Tokens that end a statement
    pub fn is_boundary(self) -> bool {
        matches!(
            self,
            TokenKind::Semicolon | TokenKind::BatchSeparator | TokenKind::BlockMarker
        )
    }
}

/// A classified region of the script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,

    /// Byte range in the script
    pub span: Range<usize>,

    /// False for a literal or block comment cut off by end of input
    pub terminated: bool,
}

impl Token {
    fn new(kind: TokenKind, span: Range<usize>, terminated: bool) -> Self {
        Self {
            kind,
            span,
            terminated,
        }
    }

    /// Text of this token within `script`
    pub fn text<'a>(&self, script: &'a str) -> &'a str {
        &script[self.span.clone()]
    }
}

/// Scanner state, entered at the start of each token
#[derive(Debug, Clone, PartialEq, Eq)]
enum ScanState {
    Normal,
    InSingleQuote,
    /// PostgreSQL `E'...'`
    InEscapeString,
    InDoubleQuote,
    InBacktick,
    InBracket,
    /// Byte length of the full `$tag$` delimiter
    InDollarQuote { delimiter_len: usize },
    InLineComment { opener_len: usize },
    InBlockComment,
    Semicolon,
    BatchSeparator,
}

/// Streaming tokenizer over a script
///
/// All delimiters are ASCII, so every span boundary is a char boundary.
pub struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    rules: DialectRules,
    pos: usize,
    paren_depth: usize,
}

impl<'a> Scanner<'a> {
    /// Create a scanner over `src` using `rules`
    pub fn new(src: &'a str, rules: DialectRules) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            rules,
            pos: 0,
            paren_depth: 0,
        }
    }

    /// Parenthesis nesting in code seen so far
    ///
    /// Never consulted for splitting.
    pub fn paren_depth(&self) -> usize {
        self.paren_depth
    }

    fn peek(&self, at: usize) -> Option<u8> {
        self.bytes.get(at).copied()
    }

    fn at_line_start(&self, at: usize) -> bool {
        at == 0 || self.bytes[at - 1] == b'\n'
    }

    fn line_end(&self, at: usize) -> usize {
        self.src[at..].find('\n').map_or(self.bytes.len(), |i| at + i)
    }

    /// State a token starting at `at` would enter, `Normal` for plain code
    fn state_at(&self, at: usize) -> ScanState {
        if self.rules.batch_separator && self.at_line_start(at) && self.is_go_line(at) {
            return ScanState::BatchSeparator;
        }

        match self.bytes[at] {
            b';' => ScanState::Semicolon,
            b'\'' => ScanState::InSingleQuote,
            b'"' => ScanState::InDoubleQuote,
            b'`' if self.rules.backtick_identifiers => ScanState::InBacktick,
            b'[' if self.rules.bracket_identifiers => ScanState::InBracket,
            b'$' if self.rules.dollar_quotes => match self.dollar_delimiter_len(at) {
                Some(delimiter_len) => ScanState::InDollarQuote { delimiter_len },
                None => ScanState::Normal,
            },
            b'E' | b'e' if self.is_escape_string(at) => ScanState::InEscapeString,
            b'-' if self.peek(at + 1) == Some(b'-') && self.dashes_open_comment(at) => {
                ScanState::InLineComment { opener_len: 2 }
            }
            b'#' if self.rules.hash_comments => ScanState::InLineComment { opener_len: 1 },
            b'/' if self.peek(at + 1) == Some(b'*') => ScanState::InBlockComment,
            _ => ScanState::Normal,
        }
    }

    fn is_escape_string(&self, at: usize) -> bool {
        self.rules.escape_strings
            && self.peek(at + 1) == Some(b'\'')
            && (at == 0 || !is_ident_byte(self.bytes[at - 1]))
    }

    fn dashes_open_comment(&self, at: usize) -> bool {
        !self.rules.dash_comment_needs_space
            || self
                .peek(at + 2)
                .is_none_or(|b| b.is_ascii_whitespace() || b.is_ascii_control())
    }

    fn is_go_line(&self, at: usize) -> bool {
        self.src[at..self.line_end(at)]
            .trim()
            .eq_ignore_ascii_case("go")
    }

    /// Length of a `$tag$` opener at `at`, if one starts there
    fn dollar_delimiter_len(&self, at: usize) -> Option<usize> {
        if at > 0 && is_ident_byte(self.bytes[at - 1]) {
            return None;
        }

        let mut end = at + 1;
        if self
            .peek(end)
            .is_some_and(|b| b.is_ascii_alphabetic() || b == b'_')
        {
            end += 1;
            while self.peek(end).is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_') {
                end += 1;
            }
        }

        (self.peek(end) == Some(b'$')).then_some(end + 1 - at)
    }

    fn scan_code(&mut self, start: usize) -> Token {
        let mut at = start;
        while at < self.bytes.len() {
            if at > start && self.state_at(at) != ScanState::Normal {
                break;
            }
            match self.bytes[at] {
                b'(' => self.paren_depth += 1,
                b')' => self.paren_depth = self.paren_depth.saturating_sub(1),
                _ => {}
            }
            at += 1;
        }
        Token::new(TokenKind::Code, start..at, true)
    }

    /// Quoted region closed by `close`, where a doubled `close` is an escape
    fn scan_quoted(&self, start: usize, close: u8, kind: QuoteKind) -> Token {
        let backslash = self.rules.backslash_escapes
            && matches!(kind, QuoteKind::Single | QuoteKind::Double);
        self.scan_literal(start, start + 1, close, kind, backslash)
    }

    /// Literal whose body starts at `body`
    fn scan_literal(
        &self,
        start: usize,
        body: usize,
        close: u8,
        kind: QuoteKind,
        backslash: bool,
    ) -> Token {
        let mut at = body;
        while at < self.bytes.len() {
            let b = self.bytes[at];
            if backslash && b == b'\\' {
                at += 2;
                continue;
            }
            if b == close {
                if self.peek(at + 1) == Some(close) {
                    at += 2;
                    continue;
                }
                return Token::new(TokenKind::Quoted(kind), start..at + 1, true);
            }
            at += 1;
        }
        Token::new(TokenKind::Quoted(kind), start..self.bytes.len(), false)
    }

    fn scan_dollar(&self, start: usize, delimiter_len: usize) -> Token {
        let delimiter = &self.src[start..start + delimiter_len];
        let body = start + delimiter_len;
        match self.src[body..].find(delimiter) {
            Some(i) => Token::new(
                TokenKind::Quoted(QuoteKind::Dollar),
                start..body + i + delimiter_len,
                true,
            ),
            None => Token::new(
                TokenKind::Quoted(QuoteKind::Dollar),
                start..self.bytes.len(),
                false,
            ),
        }
    }

    fn scan_line_comment(&self, start: usize, opener_len: usize) -> Token {
        let end = self.line_end(start);
        let kind = if is_block_marker(&self.src[start + opener_len..end]) {
            TokenKind::BlockMarker
        } else {
            TokenKind::LineComment
        };
        Token::new(kind, start..end, true)
    }

    fn scan_block_comment(&self, start: usize) -> Token {
        let mut depth = 1usize;
        let mut at = start + 2;
        while at < self.bytes.len() {
            match (self.bytes[at], self.peek(at + 1)) {
                (b'*', Some(b'/')) => {
                    depth -= 1;
                    at += 2;
                    if depth == 0 {
                        return Token::new(TokenKind::BlockComment, start..at, true);
                    }
                }
                (b'/', Some(b'*')) if self.rules.nested_block_comments => {
                    depth += 1;
                    at += 2;
                }
                _ => at += 1,
            }
        }
        Token::new(TokenKind::BlockComment, start..self.bytes.len(), false)
    }
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let start = self.pos;
        if start >= self.bytes.len() {
            return None;
        }

        let token = match self.state_at(start) {
            ScanState::Normal => self.scan_code(start),
            ScanState::Semicolon => Token::new(TokenKind::Semicolon, start..start + 1, true),
            ScanState::BatchSeparator => {
                Token::new(TokenKind::BatchSeparator, start..self.line_end(start), true)
            }
            ScanState::InSingleQuote => self.scan_quoted(start, b'\'', QuoteKind::Single),
            ScanState::InEscapeString => {
                self.scan_literal(start, start + 2, b'\'', QuoteKind::Single, true)
            }
            ScanState::InDoubleQuote => self.scan_quoted(start, b'"', QuoteKind::Double),
            ScanState::InBacktick => self.scan_quoted(start, b'`', QuoteKind::Backtick),
            ScanState::InBracket => self.scan_quoted(start, b']', QuoteKind::Bracket),
            ScanState::InDollarQuote { delimiter_len } => self.scan_dollar(start, delimiter_len),
            ScanState::InLineComment { opener_len } => self.scan_line_comment(start, opener_len),
            ScanState::InBlockComment => self.scan_block_comment(start),
        };

        self.pos = token.span.end;
        Some(token)
    }
}

/// Tokenize a whole script
pub fn tokenize(src: &str, rules: DialectRules) -> Vec<Token> {
    Scanner::new(src, rules).collect()
}

/// Name carried by a block marker comment, `None` if `comment` is not one
///
/// `comment` is the full comment text including its `--` or `#` opener.
pub fn block_marker_name(comment: &str) -> Option<&str> {
    let body = comment
        .strip_prefix("--")
        .or_else(|| comment.strip_prefix('#'))?;
    let rest = body.trim_start().strip_prefix(BLOCK_MARKER)?;
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim())
}

fn is_block_marker(body: &str) -> bool {
    body.trim_start()
        .strip_prefix(BLOCK_MARKER)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

pub(crate) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqltools_dialect::Dialect;

    fn kinds(src: &str, dialect: Dialect) -> Vec<TokenKind> {
        tokenize(src, dialect.rules()).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokens_cover_whole_input() {
        let src = "SELECT 'a;b' /* c */ FROM t; -- tail";
        let tokens = tokenize(src, DialectRules::default());
        let rebuilt: String = tokens.iter().map(|t| t.text(src)).collect();
        assert_eq!(rebuilt, src);
    }

    #[test]
    fn test_doubled_quote_stays_inside() {
        assert_eq!(
            kinds("'it''s'", Dialect::Generic),
            vec![TokenKind::Quoted(QuoteKind::Single)]
        );
    }

    #[test]
    fn test_dollar_requires_tag_syntax() {
        assert_eq!(kinds("$1", Dialect::PostgreSQL), vec![TokenKind::Code]);
        assert_eq!(
            kinds("$fn$ x $fn$", Dialect::PostgreSQL),
            vec![TokenKind::Quoted(QuoteKind::Dollar)]
        );
        assert_eq!(kinds("$$ x $$", Dialect::MySQL), vec![TokenKind::Code]);
    }

    #[test]
    fn test_escape_string_keeps_backslash_quote_inside() {
        let src = "E'it\\'s' x";
        let tokens = tokenize(src, Dialect::PostgreSQL.rules());

        assert_eq!(tokens[0].kind, TokenKind::Quoted(QuoteKind::Single));
        assert_eq!(tokens[0].text(src), "E'it\\'s'");
        let src = "tablE'x'";
        assert_eq!(tokenize(src, Dialect::PostgreSQL.rules())[0].text(src), "tablE");
        assert_eq!(
            kinds("E'a'", Dialect::Generic),
            vec![TokenKind::Code, TokenKind::Quoted(QuoteKind::Single)]
        );
    }

    #[test]
    fn test_mysql_dashes_need_space() {
        assert_eq!(kinds("1--1", Dialect::MySQL), vec![TokenKind::Code]);
        assert_eq!(
            kinds("1-- c", Dialect::MySQL),
            vec![TokenKind::Code, TokenKind::LineComment]
        );
        assert_eq!(
            kinds("1--\tc", Dialect::MySQL),
            vec![TokenKind::Code, TokenKind::LineComment]
        );
        assert_eq!(
            kinds("1--1", Dialect::Generic),
            vec![TokenKind::Code, TokenKind::LineComment]
        );
    }

    #[test]
    fn test_block_marker_name() {
        assert_eq!(block_marker_name("-- @block Users"), Some("Users"));
        assert_eq!(block_marker_name("--@block"), Some(""));
        assert_eq!(block_marker_name("-- @blocks"), None);
        assert_eq!(block_marker_name("-- plain"), None);
    }

    #[test]
    fn test_paren_depth_tracked() {
        let mut scanner = Scanner::new("SELECT (1 + (2", DialectRules::default());
        while scanner.next().is_some() {}
        assert_eq!(scanner.paren_depth(), 2);
    }
}
