// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Command handler integration tests
//!
//! Drive `workspace/executeCommand` handlers against an in-memory document
//! store, the same way the backend does.

use serde_json::{Value, json};
use sqltools_dialect::Dialect;
use sqltools_lsp::commands::{
    BLOCK_AT_CURSOR, QUERY_PARAMETERS, SPLIT_STATEMENTS, STATEMENT_AT_CURSOR,
};
use sqltools_lsp::{DocumentStore, LspError, ServerConfig, execute};
use sqltools_test_utils::SqlFixtures;
use tower_lsp::lsp_types::{
    Position, Range, TextDocumentContentChangeEvent, Url, VersionedTextDocumentIdentifier,
};

fn test_uri() -> Url {
    Url::parse("file:///workspace/script.sql").unwrap()
}

async fn store_with(text: &str, language_id: &str) -> DocumentStore {
    let store = DocumentStore::new();
    store
        .open_document(test_uri(), text.to_string(), 1, language_id.to_string())
        .await
        .unwrap();
    store
}

async fn run(command: &str, args: Value, store: &DocumentStore) -> Result<Value, LspError> {
    execute(command, &[args], store, &ServerConfig::default()).await
}

#[tokio::test]
async fn test_split_statements_of_open_document() {
    let store = store_with(SqlFixtures::blocks(), "sql").await;

    let result = run(SPLIT_STATEMENTS, json!({ "uri": test_uri() }), &store)
        .await
        .unwrap();

    let statements = result.as_array().unwrap();
    assert_eq!(statements.len(), 3);
    assert_eq!(statements[0]["text"], "SELECT * FROM users");
    assert_eq!(statements[0]["block"], "Users");
    assert_eq!(statements[1]["index"], 1);
    assert_eq!(
        statements[2]["text"],
        "SELECT * FROM orders WHERE note = '-- @block not a marker'"
    );
    assert_eq!(statements[2]["block"], "Orders");
    assert_eq!(
        statements[0]["range"],
        json!({
            "start": { "line": 1, "character": 0 },
            "end": { "line": 1, "character": 19 }
        })
    );
}

#[tokio::test]
async fn test_split_statements_of_plain_text_has_no_ranges() {
    let store = DocumentStore::new();

    let result = run(
        SPLIT_STATEMENTS,
        json!({ "text": SqlFixtures::mssql_batches(), "dialect": "mssql" }),
        &store,
    )
    .await
    .unwrap();

    let texts: Vec<&str> = result
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["text"].as_str().unwrap())
        .collect();
    assert_eq!(
        texts,
        vec![
            "CREATE TABLE #tmp (id INT)",
            "INSERT INTO #tmp VALUES (1)",
            "SELECT * FROM [weird;name]",
        ]
    );
    assert!(result[0].get("range").is_none());
}

#[tokio::test]
async fn test_language_id_selects_dialect() {
    let store = store_with(SqlFixtures::pg_function(), "pgsql").await;

    let result = run(SPLIT_STATEMENTS, json!({ "uri": test_uri() }), &store)
        .await
        .unwrap();
    assert_eq!(result.as_array().unwrap().len(), 2);

    // Forcing the generic dialect splits inside the dollar quote
    let result = run(
        SPLIT_STATEMENTS,
        json!({ "uri": test_uri(), "dialect": "generic" }),
        &store,
    )
    .await
    .unwrap();
    assert!(result.as_array().unwrap().len() > 2);
}

#[tokio::test]
async fn test_configured_dialect_overrides_language_id() {
    let store = store_with("SELECT 1\nGO\nSELECT 2", "sql").await;
    let config = ServerConfig {
        dialect: Some(Dialect::MSSQL),
        ..Default::default()
    };

    let result = execute(SPLIT_STATEMENTS, &[json!({ "uri": test_uri() })], &store, &config)
        .await
        .unwrap();
    assert_eq!(result.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_statement_at_cursor() {
    let store = store_with(SqlFixtures::blocks(), "sql").await;

    let result = run(
        STATEMENT_AT_CURSOR,
        json!({ "uri": test_uri(), "position": { "line": 2, "character": 3 } }),
        &store,
    )
    .await
    .unwrap();

    assert_eq!(result["text"], "SELECT count(*) FROM users");
    assert_eq!(result["index"], 1);
    assert_eq!(result["range"]["start"], json!({ "line": 2, "character": 0 }));
}

#[tokio::test]
async fn test_statement_at_cursor_on_blank_line_uses_previous_statement() {
    let store = store_with("SELECT 1;\n\n\nSELECT 2;", "sql").await;

    let result = run(
        STATEMENT_AT_CURSOR,
        json!({ "uri": test_uri(), "position": { "line": 1, "character": 0 } }),
        &store,
    )
    .await
    .unwrap();

    assert_eq!(result["text"], "SELECT 1");
}

#[tokio::test]
async fn test_statement_at_cursor_in_empty_document_is_null() {
    let store = store_with("-- nothing here", "sql").await;

    let result = run(
        STATEMENT_AT_CURSOR,
        json!({ "uri": test_uri(), "position": { "line": 0, "character": 3 } }),
        &store,
    )
    .await
    .unwrap();

    assert!(result.is_null());
}

#[tokio::test]
async fn test_statement_at_cursor_follows_edits() {
    let store = store_with("SELECT 1;", "sql").await;
    let identifier = VersionedTextDocumentIdentifier {
        uri: test_uri(),
        version: 2,
    };
    let changes = vec![TextDocumentContentChangeEvent {
        range: Some(Range::new(Position::new(0, 9), Position::new(0, 9))),
        range_length: None,
        text: "\nSELECT 'é', 2;".to_string(),
    }];
    store.update_document(&identifier, &changes).await.unwrap();

    let result = run(
        STATEMENT_AT_CURSOR,
        json!({ "uri": test_uri(), "position": { "line": 1, "character": 11 } }),
        &store,
    )
    .await
    .unwrap();

    assert_eq!(result["text"], "SELECT 'é', 2");
    assert_eq!(result["range"]["end"], json!({ "line": 1, "character": 13 }));
}

#[tokio::test]
async fn test_block_at_cursor() {
    let store = store_with(SqlFixtures::blocks(), "sql").await;

    let result = run(
        BLOCK_AT_CURSOR,
        json!({ "uri": test_uri(), "position": { "line": 5, "character": 0 } }),
        &store,
    )
    .await
    .unwrap();

    assert_eq!(result["name"], "Orders");
    assert_eq!(
        result["text"],
        "SELECT * FROM orders WHERE note = '-- @block not a marker';"
    );
}

#[tokio::test]
async fn test_block_at_cursor_before_first_marker_is_null() {
    let store = store_with("SELECT 0;\n-- @block One\nSELECT 1;", "sql").await;

    let result = run(
        BLOCK_AT_CURSOR,
        json!({ "uri": test_uri(), "position": { "line": 0, "character": 2 } }),
        &store,
    )
    .await
    .unwrap();

    assert!(result.is_null());
}

#[tokio::test]
async fn test_query_parameters() {
    let store = DocumentStore::new();

    let result = run(
        QUERY_PARAMETERS,
        json!({
            "text": "SELECT * FROM t WHERE a = $1 AND b = $2 AND c = $1 AND d::text = :name",
            "dialect": "pg"
        }),
        &store,
    )
    .await
    .unwrap();

    let names: Vec<&str> = result
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["$1", "$2", ":name"]);
    assert_eq!(result[0]["kind"], "numbered");
    assert_eq!(result[2]["kind"], "named");
}

#[tokio::test]
async fn test_query_parameters_disabled_by_config() {
    let store = DocumentStore::new();
    let config = ServerConfig {
        params_enabled: false,
        ..Default::default()
    };

    let result = execute(
        QUERY_PARAMETERS,
        &[json!({ "text": "SELECT ?" })],
        &store,
        &config,
    )
    .await;

    assert!(matches!(result, Err(LspError::CommandDisabled(_))));
}

#[tokio::test]
async fn test_command_errors() {
    let store = store_with("SELECT 1", "sql").await;

    let result = run("sqltools.nope", json!({ "text": "SELECT 1" }), &store).await;
    assert!(matches!(result, Err(LspError::UnknownCommand(_))));

    let result = run(SPLIT_STATEMENTS, json!({}), &store).await;
    assert!(matches!(result, Err(LspError::MissingArgument("uri"))));

    let result = run(
        SPLIT_STATEMENTS,
        json!({ "uri": "file:///workspace/other.sql" }),
        &store,
    )
    .await;
    assert!(matches!(result, Err(LspError::DocumentNotFound(_))));

    let result = run(STATEMENT_AT_CURSOR, json!({ "uri": test_uri() }), &store).await;
    assert!(matches!(result, Err(LspError::MissingArgument("position"))));

    let result = run(
        STATEMENT_AT_CURSOR,
        json!({ "uri": test_uri(), "position": { "line": 9, "character": 0 } }),
        &store,
    )
    .await;
    assert!(matches!(result, Err(LspError::InvalidPosition(_))));

    let result = run(
        SPLIT_STATEMENTS,
        json!({ "text": "SELECT 1", "dialect": "dbase" }),
        &store,
    )
    .await;
    assert!(matches!(result, Err(LspError::Dialect(_))));
}
