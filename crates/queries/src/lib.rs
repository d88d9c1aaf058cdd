// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQLTools - Query Templates
//!
//! Drivers build their catalog and preview queries from templates instead
//! of string concatenation. A template marks where parameters go and how
//! each one must be rendered:
//!
//! ```
//! use serde_json::json;
//! use sqltools_dialect::Dialect;
//! use sqltools_queries::QueryTemplate;
//!
//! let template = QueryTemplate::parse("SELECT * FROM {table:ident} LIMIT {limit:num}").unwrap();
//! let params = json!({ "table": "public.users", "limit": 50 });
//! let sql = template.render(Dialect::PostgreSQL, params.as_object().unwrap()).unwrap();
//! assert_eq!(sql, r#"SELECT * FROM "public"."users" LIMIT 50"#);
//! ```
//!
//! [`BaseQueries`] bundles the standard set every driver provides (record
//! preview, counts, table/column/schema listings) per dialect family.

pub mod base;
pub mod error;
pub mod template;

pub use base::{BaseQueries, QueryKind};
pub use error::{TemplateError, TemplateResult};
pub use template::{ParamFormat, Params, QueryTemplate};
