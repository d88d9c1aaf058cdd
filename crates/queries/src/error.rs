// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for query templates

use sqltools_dialect::Dialect;
use thiserror::Error;

use crate::base::QueryKind;

/// Result type alias for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while parsing or rendering a template
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// `{` without a closing `}`
    #[error("Unclosed placeholder starting at byte {0}")]
    UnclosedPlaceholder(usize),

    /// `}` outside a placeholder and not doubled
    #[error("Unmatched '}}' at byte {0}")]
    UnmatchedBrace(usize),

    /// Placeholder name is empty or not an identifier
    #[error("Invalid placeholder '{0}'")]
    InvalidPlaceholder(String),

    /// Placeholder format is not one of raw, ident, literal, num
    #[error("Unknown placeholder format '{0}'")]
    UnknownFormat(String),

    /// Parameter referenced by the template was not supplied
    #[error("Missing parameter '{0}'")]
    MissingParam(String),

    /// Parameter value cannot be rendered in the requested format
    #[error("Parameter '{name}' must be {expected}")]
    InvalidValue { name: String, expected: &'static str },

    /// The dialect has no template for this query
    #[error("Query {0} is not available for {1}")]
    Unsupported(QueryKind, Dialect),
}
