// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQLTools - Result Normalizer
//!
//! Every driver hands back results in its vendor's shape: `rows` plus
//! `fields` for PostgreSQL, bare row arrays or OK packets for MySQL,
//! `recordset`/`rowsAffected` for SQL Server. This crate maps them onto one
//! record per statement:
//!
//! ```text
//! { query, cols, results, messages, error }
//! ```
//!
//! Catalog listings additionally go through a declarative per-dialect
//! field-mapping table ([`mapping`]) so `ISVIEW`, `is_view` and `TABTYPE`
//! all end up as `isView`.
//!
//! Normalization never fails. Vendor errors become `error: true` plus a
//! message; statements and results that cannot be paired get an empty
//! record explaining why.

pub mod mapping;
pub mod normalizer;
pub mod result;

pub use mapping::{Conversion, FieldRule, MetadataKind, field_rules, normalize_row};
pub use normalizer::{EXTRA_RESULT_MESSAGE, MISSING_RESULT_MESSAGE, ResultNormalizer};
pub use result::{NormalizedResult, Row, VendorResult};
