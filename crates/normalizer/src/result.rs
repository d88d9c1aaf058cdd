// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Result Shapes
//!
//! [`VendorResult`] is what a driver reports for one statement;
//! [`NormalizedResult`] is what the UI layer consumes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One result row, column name to value, in column order
pub type Row = Map<String, Value>;

/// Raw per-statement result as reported by a driver
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorResult {
    /// Column names, when the vendor reports them separately from rows
    pub cols: Option<Vec<String>>,

    #[serde(default)]
    pub rows: Vec<Row>,

    /// Rows inserted, updated or deleted
    pub affected_rows: Option<u64>,

    /// Command tag, e.g. `INSERT` or `SELECT`
    pub command: Option<String>,

    #[serde(default)]
    pub warnings: Vec<String>,

    /// Error reported by the server for this statement
    pub error: Option<String>,
}

impl VendorResult {
    /// Result carrying rows
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    /// Result of a data-modifying statement
    pub fn with_affected(affected_rows: u64) -> Self {
        Self {
            affected_rows: Some(affected_rows),
            ..Default::default()
        }
    }

    /// Result of a failed statement
    pub fn with_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn cols(mut self, cols: Vec<String>) -> Self {
        self.cols = Some(cols);
        self
    }

    pub fn warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Decode the result payload of a JavaScript-style vendor client
    ///
    /// Recognized shapes:
    /// - an array of row objects (mysql, sqlite)
    /// - `{ rows, fields: [{ name }], rowCount, command }` (pg)
    /// - `{ affectedRows, warningCount, message }` (mysql OK packet)
    /// - `{ recordset, rowsAffected: [n] }` (mssql)
    /// - `{ error | message }` with no rows, as an error
    ///
    /// Anything else is kept as a single row so no data is lost.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Array(items) => Self::with_rows(rows_of(items)),
            Value::Object(object) => Self::from_object(object),
            Value::Null => Self::default(),
            other => {
                let mut row = Row::new();
                row.insert("value".to_string(), other.clone());
                Self::with_rows(vec![row])
            }
        }
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        let rows = object
            .get("rows")
            .or_else(|| object.get("recordset"))
            .and_then(Value::as_array)
            .map(|items| rows_of(items));

        let cols = object.get("fields").and_then(Value::as_array).map(|fields| {
            fields
                .iter()
                .filter_map(|field| field.get("name").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        });

        let affected_rows = object
            .get("affectedRows")
            .or_else(|| object.get("rowCount"))
            .or_else(|| object.get("changes"))
            .and_then(Value::as_u64)
            .or_else(|| {
                object
                    .get("rowsAffected")
                    .and_then(Value::as_array)
                    .map(|counts| counts.iter().filter_map(Value::as_u64).sum())
            });

        let command = object
            .get("command")
            .and_then(Value::as_str)
            .map(str::to_string);

        let mut warnings = Vec::new();
        let warning_count = object
            .get("warningCount")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        if warning_count > 0 {
            warnings.push(format!("{warning_count} warning(s) reported."));
        }

        let error = match object.get("error") {
            Some(Value::String(message)) => Some(message.clone()),
            Some(Value::Object(err)) => err
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| Some(Value::Object(err.clone()).to_string())),
            _ => None,
        };

        let recognized = rows.is_some() || affected_rows.is_some() || error.is_some();
        if !recognized {
            return Self::with_rows(vec![object.clone()]);
        }

        Self {
            cols,
            rows: rows.unwrap_or_default(),
            affected_rows,
            command,
            warnings,
            error,
        }
    }
}

fn rows_of(items: &[Value]) -> Vec<Row> {
    items
        .iter()
        .map(|item| match item {
            Value::Object(row) => row.clone(),
            other => {
                let mut row = Row::new();
                row.insert("value".to_string(), other.clone());
                row
            }
        })
        .collect()
}

/// Normalized per-statement result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResult {
    /// Statement that produced this result
    pub query: String,

    /// Column names in display order
    pub cols: Vec<String>,

    pub results: Vec<Row>,

    pub messages: Vec<String>,

    pub error: bool,
}

impl NormalizedResult {
    /// Empty result explaining why no data is present
    pub fn empty(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            messages: vec![message.into()],
            ..Default::default()
        }
    }
}
