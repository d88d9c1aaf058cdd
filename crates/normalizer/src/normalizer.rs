// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Result Normalizer
//!
//! Pairs each statement with the vendor result at the same position. Drivers
//! that batch statements may report fewer or more results than statements;
//! the leftovers on either side still produce a record so the UI shows one
//! entry per statement and nothing the server returned is dropped.

use sqltools_dialect::Dialect;
use sqltools_splitter::StatementSplitter;
use tracing::{debug, warn};

use crate::mapping::{MetadataKind, normalize_row};
use crate::result::{NormalizedResult, Row, VendorResult};

/// Message attached to a statement with no vendor result
pub const MISSING_RESULT_MESSAGE: &str = "No result returned for this statement.";

/// Message attached to a vendor result with no statement
pub const EXTRA_RESULT_MESSAGE: &str = "Result has no matching statement.";

/// Maps vendor results of one dialect onto [`NormalizedResult`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultNormalizer {
    dialect: Dialect,
}

impl ResultNormalizer {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Normalize results positionally against `statements`
    pub fn normalize<S: AsRef<str>>(
        &self,
        statements: &[S],
        results: Vec<VendorResult>,
    ) -> Vec<NormalizedResult> {
        if statements.len() != results.len() {
            warn!(
                dialect = %self.dialect,
                statements = statements.len(),
                results = results.len(),
                "statement and result counts differ, aligning by index"
            );
        }

        let mut results = results.into_iter();
        let mut normalized: Vec<NormalizedResult> = statements
            .iter()
            .map(|statement| match results.next() {
                Some(result) => self.normalize_one(statement.as_ref(), result),
                None => NormalizedResult::empty(statement.as_ref(), MISSING_RESULT_MESSAGE),
            })
            .collect();

        for extra in results {
            let mut record = self.normalize_one("", extra);
            record.messages.insert(0, EXTRA_RESULT_MESSAGE.to_string());
            normalized.push(record);
        }

        debug!(count = normalized.len(), "normalized results");
        normalized
    }

    /// Split `script` and normalize `results` against its statements
    pub fn normalize_script(&self, script: &str, results: Vec<VendorResult>) -> Vec<NormalizedResult> {
        let statements = StatementSplitter::new(self.dialect).split(script);
        self.normalize(&statements, results)
    }

    /// Normalize a single statement's result
    pub fn normalize_one(&self, query: &str, result: VendorResult) -> NormalizedResult {
        let VendorResult {
            cols,
            rows,
            affected_rows,
            command,
            warnings,
            error,
        } = result;

        let mut messages = Vec::new();
        let failed = error.is_some();
        match error {
            Some(message) => messages.push(message),
            None => messages.push(executed_message(command.as_deref(), affected_rows)),
        }
        messages.extend(warnings);

        let cols = cols.unwrap_or_else(|| columns_of(&rows));

        NormalizedResult {
            query: query.to_string(),
            cols,
            results: rows,
            messages,
            error: failed,
        }
    }

    /// Rename vendor catalog fields onto the normalized vocabulary
    pub fn normalize_metadata(&self, kind: MetadataKind, rows: &[Row]) -> Vec<Row> {
        rows.iter()
            .map(|row| normalize_row(self.dialect, kind, row))
            .collect()
    }
}

fn executed_message(command: Option<&str>, affected_rows: Option<u64>) -> String {
    let subject = command.unwrap_or("Query");
    let is_select = command.is_some_and(|c| c.eq_ignore_ascii_case("select"));
    match affected_rows {
        Some(count) if !is_select => {
            format!("{subject} successfully executed. {count} rows were affected.")
        }
        _ => format!("{subject} successfully executed."),
    }
}

/// Column names from the keys of the first row, in order
fn columns_of(rows: &[Row]) -> Vec<String> {
    rows.first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executed_message() {
        assert_eq!(
            executed_message(Some("INSERT"), Some(3)),
            "INSERT successfully executed. 3 rows were affected."
        );
        assert_eq!(
            executed_message(Some("SELECT"), Some(3)),
            "SELECT successfully executed."
        );
        assert_eq!(executed_message(None, None), "Query successfully executed.");
    }
}
