// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! YAML split case format
//!
//! Each case names a dialect, an input script and the statements the
//! splitter must produce:
//!
//! ```yaml
//! - description: semicolon inside literal
//!   dialect: generic
//!   input: "SELECT ';' FROM t; SELECT 2;"
//!   expected:
//!     - "SELECT ';' FROM t"
//!     - SELECT 2
//! ```

use std::path::Path;

use serde::Deserialize;
use sqltools_dialect::Dialect;
use thiserror::Error;

const BUILTIN_CASES: &str = include_str!("../fixtures/split_cases.yaml");

/// A single split case
#[derive(Debug, Clone, Deserialize)]
pub struct SplitCase {
    pub description: String,
    #[serde(default)]
    pub dialect: Dialect,
    pub input: String,
    pub expected: Vec<String>,
}

/// Case loading errors
#[derive(Debug, Error)]
pub enum CaseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid case file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Empty case file")]
    EmptyFile,
}

/// Parse cases from YAML content
pub fn parse_cases(content: &str) -> Result<Vec<SplitCase>, CaseError> {
    let cases: Vec<SplitCase> = serde_yaml::from_str(content)?;
    if cases.is_empty() {
        return Err(CaseError::EmptyFile);
    }
    Ok(cases)
}

/// Parse cases from a YAML file
pub fn parse_case_file(path: &Path) -> Result<Vec<SplitCase>, CaseError> {
    let content = std::fs::read_to_string(path)?;
    parse_cases(&content)
}

/// Cases shipped with this crate
pub fn builtin_cases() -> Vec<SplitCase> {
    parse_cases(BUILTIN_CASES).expect("builtin split cases are valid YAML")
}
