// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQLTools - Dialects
//!
//! This crate identifies the SQL dialect a script is written in and carries
//! the lexical rules every other crate needs to treat that dialect correctly.
//!
//! - [`Dialect`]: one variant per supported driver, parsed from driver ids
//! - [`DialectFamily`]: groupings that share syntax
//! - [`DialectRules`]: the quoting/comment/boundary table consumed by the
//!   statement scanner and the query templates

pub mod dialect;
pub mod rules;

pub use dialect::{Dialect, DialectError, DialectFamily};
pub use rules::DialectRules;
