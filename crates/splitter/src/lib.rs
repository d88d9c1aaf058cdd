// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQLTools - Statement Splitter
//!
//! Lexical processing of SQL scripts: splitting a script into statements,
//! finding the statement or `@block` under the cursor, producing one-line
//! renditions for display and locating bind parameters.
//!
//! Everything here is a pure function of its input. Malformed SQL never
//! produces an error: an unterminated literal or comment simply extends to
//! the end of the script, and the database reports the syntax error when the
//! resulting statement is executed.
//!
//! ## Example
//!
//! ```
//! use sqltools_dialect::Dialect;
//! use sqltools_splitter::split;
//!
//! let statements = split("SELECT 1 -- comment with ; inside\n; SELECT 2;", Dialect::Generic);
//! assert_eq!(statements, vec!["SELECT 1 -- comment with ; inside", "SELECT 2"]);
//! ```
//!
//! ## Modules
//!
//! - [`scanner`]: finite-state tokenizer driven by [`sqltools_dialect::DialectRules`]
//! - [`splitter`]: statement boundaries and cursor lookup
//! - [`blocks`]: `-- @block` regions
//! - [`cleanup`]: comment stripping for display
//! - [`params`]: bind placeholder detection

pub mod blocks;
pub mod cleanup;
pub mod params;
pub mod scanner;
pub mod splitter;

pub use blocks::{Block, block_at, blocks};
pub use cleanup::clean_up;
pub use params::{ParameterKind, QueryParameter, query_parameters};
pub use scanner::{QuoteKind, Scanner, Token, TokenKind, tokenize};
pub use splitter::{Statement, StatementSplitter, split, split_statements, statement_at};
