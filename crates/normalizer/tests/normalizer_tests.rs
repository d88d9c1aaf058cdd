// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Result normalizer integration tests

use serde_json::{Value, json};
use sqltools_dialect::Dialect;
use sqltools_normalizer::{
    EXTRA_RESULT_MESSAGE, MISSING_RESULT_MESSAGE, MetadataKind, NormalizedResult,
    ResultNormalizer, Row, VendorResult,
};

fn row(value: Value) -> Row {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_pairs_by_index() {
    let normalizer = ResultNormalizer::new(Dialect::PostgreSQL);
    let results = normalizer.normalize(
        &["SELECT 1 AS a", "UPDATE t SET x = 1"],
        vec![
            VendorResult::with_rows(vec![row(json!({ "a": 1 }))]).command("SELECT"),
            VendorResult::with_affected(4).command("UPDATE"),
        ],
    );

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].query, "SELECT 1 AS a");
    assert_eq!(results[0].cols, vec!["a"]);
    assert_eq!(results[0].results[0]["a"], json!(1));
    assert!(!results[0].error);
    assert_eq!(
        results[1].messages,
        vec!["UPDATE successfully executed. 4 rows were affected."]
    );
}

#[test]
fn test_columns_keep_row_order() {
    let normalizer = ResultNormalizer::new(Dialect::MySQL);
    let result = normalizer.normalize_one(
        "SELECT z, a, m FROM t",
        VendorResult::with_rows(vec![row(json!({ "z": 1, "a": 2, "m": 3 }))]),
    );
    assert_eq!(result.cols, vec!["z", "a", "m"]);
}

#[test]
fn test_vendor_columns_take_precedence() {
    let normalizer = ResultNormalizer::new(Dialect::PostgreSQL);
    let result = normalizer.normalize_one(
        "SELECT * FROM empty",
        VendorResult::default().cols(vec!["id".into(), "name".into()]),
    );
    assert_eq!(result.cols, vec!["id", "name"]);
    assert!(result.results.is_empty());
}

#[test]
fn test_missing_results_filled() {
    let normalizer = ResultNormalizer::new(Dialect::MSSQL);
    let results = normalizer.normalize(&["SELECT 1", "SELECT 2"], vec![VendorResult::default()]);

    assert_eq!(results.len(), 2);
    assert_eq!(
        results[1],
        NormalizedResult::empty("SELECT 2", MISSING_RESULT_MESSAGE)
    );
    assert!(!results[1].error);
}

#[test]
fn test_extra_results_kept() {
    let normalizer = ResultNormalizer::new(Dialect::MSSQL);
    let results = normalizer.normalize(
        &["EXEC proc"],
        vec![
            VendorResult::with_rows(vec![row(json!({ "a": 1 }))]),
            VendorResult::with_rows(vec![row(json!({ "b": 2 }))]),
        ],
    );

    assert_eq!(results.len(), 2);
    assert_eq!(results[1].query, "");
    assert_eq!(results[1].messages[0], EXTRA_RESULT_MESSAGE);
    assert_eq!(results[1].cols, vec!["b"]);
}

#[test]
fn test_error_result() {
    let normalizer = ResultNormalizer::new(Dialect::PostgreSQL);
    let result = normalizer.normalize_one(
        "SELEC 1",
        VendorResult::with_error("syntax error at or near \"SELEC\""),
    );
    assert!(result.error);
    assert_eq!(result.messages, vec!["syntax error at or near \"SELEC\""]);
}

#[test]
fn test_warnings_become_messages() {
    let normalizer = ResultNormalizer::new(Dialect::MySQL);
    let result = normalizer.normalize_one(
        "INSERT INTO t VALUES (1)",
        VendorResult::with_affected(1).warning("Data truncated for column 'x'"),
    );
    assert_eq!(result.messages.len(), 2);
    assert_eq!(result.messages[1], "Data truncated for column 'x'");
}

#[test]
fn test_normalize_script() {
    let normalizer = ResultNormalizer::new(Dialect::MSSQL);
    let results = normalizer.normalize_script(
        "SELECT 1 AS one\nGO\nSELECT 2 AS two",
        vec![
            VendorResult::with_rows(vec![row(json!({ "one": 1 }))]),
            VendorResult::with_rows(vec![row(json!({ "two": 2 }))]),
        ],
    );
    let queries: Vec<_> = results.iter().map(|r| r.query.as_str()).collect();
    assert_eq!(queries, vec!["SELECT 1 AS one", "SELECT 2 AS two"]);
}

#[test]
fn test_serialized_shape() {
    let result = NormalizedResult::empty("SELECT 1", "done");
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(
        value,
        json!({
            "query": "SELECT 1",
            "cols": [],
            "results": [],
            "messages": ["done"],
            "error": false
        })
    );
}

#[test]
fn test_from_json_pg_shape() {
    let vendor = VendorResult::from_json(&json!({
        "command": "SELECT",
        "rowCount": 1,
        "rows": [{ "id": 1 }],
        "fields": [{ "name": "id", "dataTypeID": 23 }]
    }));
    assert_eq!(vendor.cols, Some(vec!["id".to_string()]));
    assert_eq!(vendor.rows.len(), 1);
    assert_eq!(vendor.command.as_deref(), Some("SELECT"));
}

#[test]
fn test_from_json_mysql_shapes() {
    let rows = VendorResult::from_json(&json!([{ "a": 1 }, { "a": 2 }]));
    assert_eq!(rows.rows.len(), 2);

    let ok = VendorResult::from_json(&json!({ "affectedRows": 3, "warningCount": 1 }));
    assert_eq!(ok.affected_rows, Some(3));
    assert_eq!(ok.warnings, vec!["1 warning(s) reported."]);
}

#[test]
fn test_from_json_mssql_shape() {
    let vendor = VendorResult::from_json(&json!({
        "recordset": [{ "x": 1 }],
        "rowsAffected": [1, 2]
    }));
    assert_eq!(vendor.rows.len(), 1);
    assert_eq!(vendor.affected_rows, Some(3));
}

#[test]
fn test_deserialize_partial_vendor_result() {
    let vendor: VendorResult = serde_json::from_value(json!({ "affectedRows": 2 })).unwrap();
    assert_eq!(vendor, VendorResult::with_affected(2));

    let vendor: VendorResult =
        serde_json::from_value(json!({ "rows": [{ "a": 1 }], "error": null })).unwrap();
    assert_eq!(vendor.rows.len(), 1);
    assert!(vendor.warnings.is_empty());
}

#[test]
fn test_from_json_error_and_unknown() {
    let failed = VendorResult::from_json(&json!({ "error": { "message": "boom" } }));
    assert_eq!(failed.error.as_deref(), Some("boom"));

    let unknown = VendorResult::from_json(&json!({ "foo": "bar" }));
    assert_eq!(unknown.rows, vec![row(json!({ "foo": "bar" }))]);

    let scalar = VendorResult::from_json(&json!(42));
    assert_eq!(scalar.rows[0]["value"], json!(42));
}

#[test]
fn test_metadata_mapping_uppercase_vendor() {
    let normalizer = ResultNormalizer::new(Dialect::DB2);
    let rows = normalizer.normalize_metadata(
        MetadataKind::Table,
        &[row(json!({ "TABNAME": "EMP", "TABSCHEMA": "HR", "ISVIEW": 0 }))],
    );
    assert_eq!(
        rows[0],
        row(json!({ "label": "EMP", "schema": "HR", "isView": false }))
    );
}

#[test]
fn test_metadata_mapping_columns() {
    let normalizer = ResultNormalizer::new(Dialect::PostgreSQL);
    let rows = normalizer.normalize_metadata(
        MetadataKind::Column,
        &[row(json!({
            "column_name": "id",
            "table_name": "users",
            "data_type": "integer",
            "is_nullable": "NO",
            "extra": "kept"
        }))],
    );
    assert_eq!(rows[0]["label"], json!("id"));
    assert_eq!(rows[0]["table"], json!("users"));
    assert_eq!(rows[0]["dataType"], json!("integer"));
    assert_eq!(rows[0]["isNullable"], json!(false));
    assert_eq!(rows[0]["extra"], json!("kept"));
}

#[test]
fn test_metadata_oracle_flags() {
    let normalizer = ResultNormalizer::new(Dialect::Oracle);
    let rows = normalizer.normalize_metadata(
        MetadataKind::Column,
        &[row(json!({ "COLUMN_NAME": "ID", "OWNER": "HR", "NULLABLE": "Y" }))],
    );
    assert_eq!(rows[0]["schema"], json!("HR"));
    assert_eq!(rows[0]["isNullable"], json!(true));
}
