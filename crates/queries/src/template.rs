// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Query Template
//!
//! ## Syntax
//!
//! - `{name}` or `{name:raw}`: value inserted as written
//! - `{name:ident}`: identifier, quoted with the dialect's quote character;
//!   dotted paths (`schema.table`) are quoted per segment
//! - `{name:literal}`: single-quoted string literal, `NULL` for null,
//!   numbers and booleans unquoted
//! - `{name:num}`: number, rejected otherwise
//! - `{{` and `}}`: literal braces
//!
//! Templates are parsed once and rendered any number of times.

use std::fmt;

use serde_json::{Map, Value};
use sqltools_dialect::{Dialect, DialectRules};

use crate::error::{TemplateError, TemplateResult};

/// Parameter values, by placeholder name
pub type Params = Map<String, Value>;

/// How a parameter is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamFormat {
    Raw,
    Ident,
    Literal,
    Number,
}

impl ParamFormat {
    fn parse(format: &str) -> TemplateResult<Self> {
        match format {
            "" | "raw" => Ok(ParamFormat::Raw),
            "ident" => Ok(ParamFormat::Ident),
            "literal" => Ok(ParamFormat::Literal),
            "num" => Ok(ParamFormat::Number),
            other => Err(TemplateError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Text(String),
    Param { name: String, format: ParamFormat },
}

/// A parsed query template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplate {
    source: String,
    pieces: Vec<Piece>,
}

impl QueryTemplate {
    /// Parse `source` into a template
    pub fn parse(source: &str) -> TemplateResult<Self> {
        let mut pieces = Vec::new();
        let mut text = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((at, c)) = chars.next() {
            match c {
                '{' if chars.peek().is_some_and(|&(_, next)| next == '{') => {
                    chars.next();
                    text.push('{');
                }
                '}' if chars.peek().is_some_and(|&(_, next)| next == '}') => {
                    chars.next();
                    text.push('}');
                }
                '}' => return Err(TemplateError::UnmatchedBrace(at)),
                '{' => {
                    let rest = &source[at + 1..];
                    let close = rest
                        .find('}')
                        .ok_or(TemplateError::UnclosedPlaceholder(at))?;
                    let (name, format) = parse_placeholder(&rest[..close])?;

                    if !text.is_empty() {
                        pieces.push(Piece::Text(std::mem::take(&mut text)));
                    }
                    pieces.push(Piece::Param { name, format });

                    // Skip the placeholder body and its closing brace
                    while chars.next_if(|&(i, _)| i <= at + 1 + close).is_some() {}
                }
                _ => text.push(c),
            }
        }

        if !text.is_empty() {
            pieces.push(Piece::Text(text));
        }

        Ok(Self {
            source: source.to_string(),
            pieces,
        })
    }

    /// Template source as written
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholder names in order of appearance, repeats included
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.pieces.iter().filter_map(|piece| match piece {
            Piece::Param { name, .. } => Some(name.as_str()),
            Piece::Text(_) => None,
        })
    }

    /// Render with `params`, quoting for `dialect`
    pub fn render(&self, dialect: Dialect, params: &Params) -> TemplateResult<String> {
        let rules = dialect.rules();
        let mut out = String::with_capacity(self.source.len());

        for piece in &self.pieces {
            match piece {
                Piece::Text(text) => out.push_str(text),
                Piece::Param { name, format } => {
                    let value = params
                        .get(name)
                        .ok_or_else(|| TemplateError::MissingParam(name.clone()))?;
                    out.push_str(&render_value(name, value, *format, &rules)?);
                }
            }
        }

        Ok(out)
    }
}

impl fmt::Display for QueryTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_placeholder(body: &str) -> TemplateResult<(String, ParamFormat)> {
    let (name, format) = body.split_once(':').unwrap_or((body, ""));
    let name = name.trim();

    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(TemplateError::InvalidPlaceholder(body.to_string()));
    }

    Ok((name.to_string(), ParamFormat::parse(format.trim())?))
}

fn render_value(
    name: &str,
    value: &Value,
    format: ParamFormat,
    rules: &DialectRules,
) -> TemplateResult<String> {
    let invalid = |expected| TemplateError::InvalidValue {
        name: name.to_string(),
        expected,
    };

    match format {
        ParamFormat::Raw => match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Null => Ok("NULL".to_string()),
            _ => Err(invalid("a scalar")),
        },
        ParamFormat::Number => match value {
            Value::Number(n) => Ok(n.to_string()),
            Value::String(s) if is_finite_number(s.trim()) => Ok(s.trim().to_string()),
            _ => Err(invalid("a number")),
        },
        ParamFormat::Literal => match value {
            Value::String(s) => Ok(quote_literal(s, rules)),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(true) => Ok("TRUE".to_string()),
            Value::Bool(false) => Ok("FALSE".to_string()),
            Value::Null => Ok("NULL".to_string()),
            _ => Err(invalid("a scalar")),
        },
        ParamFormat::Ident => match value {
            Value::String(s) if !s.is_empty() => Ok(quote_identifier(s, rules)),
            _ => Err(invalid("a non-empty string")),
        },
    }
}

/// `NaN` and `inf` parse as `f64` but are identifiers in SQL
fn is_finite_number(text: &str) -> bool {
    text.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Single-quote `value`, doubling embedded quotes
pub fn quote_literal(value: &str, rules: &DialectRules) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\\' if rules.backslash_escapes => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Quote each dot-separated segment of `path`
pub fn quote_identifier(path: &str, rules: &DialectRules) -> String {
    let open = rules.identifier_quote;
    let close = rules.identifier_close();
    path.split('.')
        .map(|segment| {
            let mut quoted = String::with_capacity(segment.len() + 2);
            quoted.push(open);
            for c in segment.chars() {
                if c == close {
                    quoted.push(close);
                }
                quoted.push(c);
            }
            quoted.push(close);
            quoted
        })
        .collect::<Vec<_>>()
        .join(".")
}
