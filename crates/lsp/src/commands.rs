// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Workspace Commands
//!
//! `workspace/executeCommand` handlers. Each command takes a single object
//! argument:
//!
//! ```json
//! { "uri": "file:///a.sql", "position": { "line": 3, "character": 0 } }
//! ```
//!
//! `text` may replace `uri` to run a command on an unsaved selection, and
//! `dialect` overrides the dialect resolved from configuration or the
//! document language id.
//!
//! | Command | Result |
//! |---------|--------|
//! | `sqltools.splitStatements` | array of statements |
//! | `sqltools.statementAtCursor` | statement or `null` |
//! | `sqltools.blockAtCursor` | block or `null` |
//! | `sqltools.queryParameters` | array of parameters |
//!
//! Byte ranges are converted to LSP ranges when the text comes from an open
//! document.

use ropey::Rope;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqltools_dialect::Dialect;
use sqltools_splitter::{
    ParameterKind, QueryParameter, Statement, block_at, query_parameters, split_statements,
    statement_at,
};
use tower_lsp::lsp_types::{Position, Range, Url};
use tracing::debug;

use crate::backend::LspError;
use crate::config::ServerConfig;
use crate::document::{Document, DocumentStore, byte_offset};

pub const SPLIT_STATEMENTS: &str = "sqltools.splitStatements";
pub const STATEMENT_AT_CURSOR: &str = "sqltools.statementAtCursor";
pub const BLOCK_AT_CURSOR: &str = "sqltools.blockAtCursor";
pub const QUERY_PARAMETERS: &str = "sqltools.queryParameters";

/// Every command advertised in `executeCommandProvider`
pub const COMMANDS: [&str; 4] = [
    SPLIT_STATEMENTS,
    STATEMENT_AT_CURSOR,
    BLOCK_AT_CURSOR,
    QUERY_PARAMETERS,
];

/// Argument object shared by all commands
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandArgs {
    pub uri: Option<Url>,
    pub text: Option<String>,
    pub dialect: Option<String>,
    pub position: Option<Position>,
}

/// A statement as returned to the client
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementInfo {
    pub index: usize,
    pub text: String,
    pub block: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
}

/// A block as returned to the client
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockInfo {
    pub name: Option<String>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
}

/// A query parameter as returned to the client
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterInfo {
    pub name: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
}

/// Script a command runs on, with the document it came from if any
struct Source {
    text: String,
    dialect: Dialect,
    document: Option<Document>,
}

impl Source {
    fn range(&self, range: &std::ops::Range<usize>) -> Option<Range> {
        self.document.as_ref().map(|doc| doc.range_of(range))
    }

    /// Byte offset of the command's cursor
    fn offset(&self, position: Option<Position>) -> Result<usize, LspError> {
        let position = position.ok_or(LspError::MissingArgument("position"))?;
        match &self.document {
            Some(doc) => doc
                .offset_at(position)
                .ok_or(LspError::InvalidPosition(position)),
            None => offset_in_text(&self.text, position)
                .ok_or(LspError::InvalidPosition(position)),
        }
    }
}

/// Run `command` with its raw JSON arguments
pub async fn execute(
    command: &str,
    arguments: &[Value],
    store: &DocumentStore,
    config: &ServerConfig,
) -> Result<Value, LspError> {
    let args = parse_args(arguments)?;
    let source = resolve_source(&args, store, config).await?;
    debug!("Executing {} with dialect {}", command, source.dialect);

    let result = match command {
        SPLIT_STATEMENTS => {
            let statements: Vec<StatementInfo> = split_statements(&source.text, source.dialect)
                .into_iter()
                .map(|statement| statement_info(&source, statement))
                .collect();
            serde_json::to_value(statements)
        }
        STATEMENT_AT_CURSOR => {
            let offset = source.offset(args.position)?;
            let statement = statement_at(&source.text, source.dialect, offset)
                .map(|statement| statement_info(&source, statement));
            serde_json::to_value(statement)
        }
        BLOCK_AT_CURSOR => {
            let offset = source.offset(args.position)?;
            let block = block_at(&source.text, source.dialect, offset).map(|block| BlockInfo {
                text: block.text(&source.text).to_string(),
                range: source.range(&block.body),
                name: block.name,
            });
            serde_json::to_value(block)
        }
        QUERY_PARAMETERS => {
            if !config.params_enabled {
                return Err(LspError::CommandDisabled(command.to_string()));
            }
            let params: Vec<ParameterInfo> = query_parameters(&source.text, source.dialect)
                .into_iter()
                .map(|param| parameter_info(&source, param))
                .collect();
            serde_json::to_value(params)
        }
        other => return Err(LspError::UnknownCommand(other.to_string())),
    };

    result.map_err(|e| LspError::Serialization(e.to_string()))
}

fn parse_args(arguments: &[Value]) -> Result<CommandArgs, LspError> {
    match arguments.first() {
        None | Some(Value::Null) => Ok(CommandArgs::default()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| LspError::InvalidArguments(e.to_string())),
    }
}

async fn resolve_source(
    args: &CommandArgs,
    store: &DocumentStore,
    config: &ServerConfig,
) -> Result<Source, LspError> {
    let explicit = args
        .dialect
        .as_deref()
        .map(str::parse::<Dialect>)
        .transpose()?;

    if let Some(text) = &args.text {
        return Ok(Source {
            text: text.clone(),
            dialect: explicit.or(config.dialect).unwrap_or_default(),
            document: None,
        });
    }

    let uri = args.uri.as_ref().ok_or(LspError::MissingArgument("uri"))?;
    let document = store
        .get_document(uri)
        .await
        .ok_or_else(|| LspError::DocumentNotFound(uri.clone()))?;

    Ok(Source {
        text: document.text(),
        dialect: explicit.unwrap_or_else(|| config.resolve_dialect(document.language_id())),
        document: Some(document),
    })
}

fn statement_info(source: &Source, statement: Statement) -> StatementInfo {
    StatementInfo {
        range: source.range(&statement.range),
        index: statement.index,
        text: statement.text,
        block: statement.block,
    }
}

fn parameter_info(source: &Source, param: QueryParameter) -> ParameterInfo {
    let kind = match param.kind {
        ParameterKind::Positional(_) => "positional",
        ParameterKind::Numbered(_) => "numbered",
        ParameterKind::Named => "named",
    };
    ParameterInfo {
        range: source.range(&param.range),
        name: param.name,
        kind,
    }
}

/// Byte offset of a position in plain text, counting UTF-16 code units
///
/// Uses the same line breaks as an open [`Document`].
fn offset_in_text(text: &str, position: Position) -> Option<usize> {
    byte_offset(&Rope::from_str(text), position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_in_text() {
        let text = "SELECT 1;\nSELECT 'é', 2;";
        assert_eq!(offset_in_text(text, Position::new(0, 0)), Some(0));
        assert_eq!(offset_in_text(text, Position::new(1, 0)), Some(10));
        assert_eq!(offset_in_text(text, Position::new(1, 10)), Some(21));
        assert_eq!(offset_in_text(text, Position::new(1, 14)), Some(text.len()));
        assert_eq!(offset_in_text(text, Position::new(1, 15)), None);
        assert_eq!(offset_in_text(text, Position::new(2, 0)), None);
    }

    #[test]
    fn test_offset_in_text_matches_document_line_breaks() {
        let text = "SELECT 'a\u{2028}b';\rSELECT 2;\r\nSELECT 3;";
        let doc = Document::new(
            Url::parse("file:///a.sql").unwrap(),
            text.to_string(),
            1,
            "sql".to_string(),
        );

        for line in 0..3 {
            let position = Position::new(line, 2);
            assert_eq!(offset_in_text(text, position), doc.offset_at(position));
        }
        assert_eq!(
            offset_in_text(text, Position::new(1, 0)),
            text.find("SELECT 2")
        );
        assert_eq!(offset_in_text(text, Position::new(0, 13)), Some("SELECT 'a\u{2028}b';".len()));
        assert_eq!(offset_in_text(text, Position::new(0, 14)), None);
    }

    #[test]
    fn test_parse_args_accepts_missing_arguments() {
        let args = parse_args(&[]).unwrap();
        assert!(args.uri.is_none());
        assert!(args.text.is_none());
    }

    #[test]
    fn test_parse_args_rejects_wrong_shape() {
        let result = parse_args(&[Value::String("file:///a.sql".into())]);
        assert!(matches!(result, Err(LspError::InvalidArguments(_))));
    }
}
