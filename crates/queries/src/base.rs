// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Base Queries
//!
//! The standard queries every driver exposes, as templates per dialect
//! family. Parameters:
//!
//! | query           | params                      |
//! |-----------------|-----------------------------|
//! | `fetchRecords`  | `table`, `limit`, `offset`  |
//! | `countRecords`  | `table`                     |
//! | `describeTable` | `table`, `schema`           |
//! | `fetchTables`   | `schema`                    |
//! | `fetchColumns`  | `table`, `schema`           |
//! | `fetchSchemas`  | none                        |
//!
//! Column aliases line up with the normalizer's field mapping table, so the
//! listings come back with `label`/`schema`/`isView` after normalization.

use std::fmt;

use serde::{Deserialize, Serialize};
use sqltools_dialect::{Dialect, DialectFamily};
use tracing::debug;

use crate::error::{TemplateError, TemplateResult};
use crate::template::{Params, QueryTemplate};

/// Standard query kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryKind {
    FetchRecords,
    CountRecords,
    DescribeTable,
    FetchTables,
    FetchColumns,
    FetchSchemas,
}

impl QueryKind {
    pub const ALL: [QueryKind; 6] = [
        QueryKind::FetchRecords,
        QueryKind::CountRecords,
        QueryKind::DescribeTable,
        QueryKind::FetchTables,
        QueryKind::FetchColumns,
        QueryKind::FetchSchemas,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            QueryKind::FetchRecords => "fetchRecords",
            QueryKind::CountRecords => "countRecords",
            QueryKind::DescribeTable => "describeTable",
            QueryKind::FetchTables => "fetchTables",
            QueryKind::FetchColumns => "fetchColumns",
            QueryKind::FetchSchemas => "fetchSchemas",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

type TemplateTable = [(QueryKind, &'static str)];

const INFORMATION_SCHEMA: &TemplateTable = &[
    (
        QueryKind::FetchRecords,
        "SELECT * FROM {table:ident} LIMIT {limit:num} OFFSET {offset:num}",
    ),
    (
        QueryKind::CountRecords,
        "SELECT count(1) AS total FROM {table:ident}",
    ),
    (
        QueryKind::DescribeTable,
        "SELECT * FROM information_schema.columns WHERE table_schema = {schema:literal} AND table_name = {table:literal} ORDER BY ordinal_position",
    ),
    (
        QueryKind::FetchTables,
        "SELECT table_name, table_schema, table_catalog, CASE WHEN table_type = 'VIEW' THEN 1 ELSE 0 END AS isview FROM information_schema.tables WHERE table_schema = {schema:literal} ORDER BY table_name",
    ),
    (
        QueryKind::FetchColumns,
        "SELECT column_name, table_name, table_schema, data_type, character_maximum_length, is_nullable, column_default FROM information_schema.columns WHERE table_schema = {schema:literal} AND table_name = {table:literal} ORDER BY ordinal_position",
    ),
    (
        QueryKind::FetchSchemas,
        "SELECT schema_name, catalog_name FROM information_schema.schemata ORDER BY schema_name",
    ),
];

const MYSQL: &TemplateTable = &[
    (
        QueryKind::FetchRecords,
        "SELECT * FROM {table:ident} LIMIT {offset:num}, {limit:num}",
    ),
    (QueryKind::DescribeTable, "DESCRIBE {table:ident}"),
    (
        QueryKind::FetchColumns,
        "SELECT column_name, table_name, table_schema, data_type, column_type, column_key, is_nullable, column_default FROM information_schema.columns WHERE table_schema = {schema:literal} AND table_name = {table:literal} ORDER BY ordinal_position",
    ),
];

const SQLSERVER: &TemplateTable = &[
    (
        QueryKind::FetchRecords,
        "SELECT * FROM {table:ident} ORDER BY (SELECT NULL) OFFSET {offset:num} ROWS FETCH NEXT {limit:num} ROWS ONLY",
    ),
    (
        QueryKind::DescribeTable,
        "EXEC sp_columns @table_name = {table:literal}, @table_owner = {schema:literal}",
    ),
    (
        QueryKind::FetchSchemas,
        "SELECT name AS schema_name FROM sys.schemas ORDER BY name",
    ),
];

const SQLITE: &TemplateTable = &[
    (
        QueryKind::FetchRecords,
        "SELECT * FROM {table:ident} LIMIT {limit:num} OFFSET {offset:num}",
    ),
    (
        QueryKind::CountRecords,
        "SELECT count(1) AS total FROM {table:ident}",
    ),
    (QueryKind::DescribeTable, "PRAGMA table_info({table:ident})"),
    (
        QueryKind::FetchTables,
        "SELECT name, tbl_name, CASE WHEN type = 'view' THEN 1 ELSE 0 END AS isview FROM sqlite_master WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%' ORDER BY name",
    ),
    (QueryKind::FetchColumns, "PRAGMA table_info({table:ident})"),
    (QueryKind::FetchSchemas, "PRAGMA database_list"),
];

const ORACLE: &TemplateTable = &[
    (
        QueryKind::FetchRecords,
        "SELECT * FROM {table:ident} OFFSET {offset:num} ROWS FETCH NEXT {limit:num} ROWS ONLY",
    ),
    (
        QueryKind::CountRecords,
        "SELECT count(1) AS total FROM {table:ident}",
    ),
    (
        QueryKind::DescribeTable,
        "SELECT * FROM all_tab_columns WHERE owner = {schema:literal} AND table_name = {table:literal} ORDER BY column_id",
    ),
    (
        QueryKind::FetchTables,
        "SELECT owner, table_name, 0 AS isview FROM all_tables WHERE owner = {schema:literal} UNION ALL SELECT owner, view_name AS table_name, 1 AS isview FROM all_views WHERE owner = {schema:literal}",
    ),
    (
        QueryKind::FetchColumns,
        "SELECT column_name, table_name, owner, data_type, data_length, nullable, data_default FROM all_tab_columns WHERE owner = {schema:literal} AND table_name = {table:literal} ORDER BY column_id",
    ),
    (
        QueryKind::FetchSchemas,
        "SELECT username FROM all_users ORDER BY username",
    ),
];

const DB2: &TemplateTable = &[
    (
        QueryKind::FetchRecords,
        "SELECT * FROM {table:ident} OFFSET {offset:num} ROWS FETCH FIRST {limit:num} ROWS ONLY",
    ),
    (
        QueryKind::CountRecords,
        "SELECT count(1) AS total FROM {table:ident}",
    ),
    (
        QueryKind::DescribeTable,
        "SELECT * FROM syscat.columns WHERE tabschema = {schema:literal} AND tabname = {table:literal} ORDER BY colno",
    ),
    (
        QueryKind::FetchTables,
        "SELECT tabname, tabschema, CASE WHEN type = 'V' THEN 1 ELSE 0 END AS isview FROM syscat.tables WHERE tabschema = {schema:literal} ORDER BY tabname",
    ),
    (
        QueryKind::FetchColumns,
        "SELECT colname, tabname, tabschema, typename, length, nulls, default FROM syscat.columns WHERE tabschema = {schema:literal} AND tabname = {table:literal} ORDER BY colno",
    ),
    (
        QueryKind::FetchSchemas,
        "SELECT schemaname FROM syscat.schemata ORDER BY schemaname",
    ),
];

const CASSANDRA: &TemplateTable = &[
    (QueryKind::FetchRecords, "SELECT * FROM {table:ident} LIMIT {limit:num}"),
    (
        QueryKind::CountRecords,
        "SELECT count(*) AS total FROM {table:ident}",
    ),
    (
        QueryKind::DescribeTable,
        "SELECT * FROM system_schema.columns WHERE keyspace_name = {schema:literal} AND table_name = {table:literal}",
    ),
    (
        QueryKind::FetchTables,
        "SELECT keyspace_name, table_name FROM system_schema.tables WHERE keyspace_name = {schema:literal}",
    ),
    (
        QueryKind::FetchColumns,
        "SELECT keyspace_name, table_name, column_name, type, kind FROM system_schema.columns WHERE keyspace_name = {schema:literal} AND table_name = {table:literal}",
    ),
    (
        QueryKind::FetchSchemas,
        "SELECT keyspace_name FROM system_schema.keyspaces",
    ),
];

const HANA: &TemplateTable = &[
    (
        QueryKind::DescribeTable,
        "SELECT * FROM sys.table_columns WHERE schema_name = {schema:literal} AND table_name = {table:literal} ORDER BY position",
    ),
    (
        QueryKind::FetchTables,
        "SELECT schema_name, table_name, 0 AS isview FROM sys.tables WHERE schema_name = {schema:literal} UNION ALL SELECT schema_name, view_name, 1 AS isview FROM sys.views WHERE schema_name = {schema:literal}",
    ),
    (
        QueryKind::FetchColumns,
        "SELECT schema_name, table_name, column_name, data_type_name, length, is_nullable, default_value FROM sys.table_columns WHERE schema_name = {schema:literal} AND table_name = {table:literal} ORDER BY position",
    ),
    (
        QueryKind::FetchSchemas,
        "SELECT schema_name FROM sys.schemas ORDER BY schema_name",
    ),
];

/// Standard query templates for one dialect
///
/// Family tables override the information_schema defaults; SQLite, Oracle,
/// DB2 and Cassandra define every query themselves.
#[derive(Debug, Clone, Copy)]
pub struct BaseQueries {
    dialect: Dialect,
    overrides: &'static TemplateTable,
    fallback: &'static TemplateTable,
}

impl BaseQueries {
    pub fn for_dialect(dialect: Dialect) -> Self {
        let (overrides, fallback): (&'static TemplateTable, &'static TemplateTable) =
            match dialect.family() {
                DialectFamily::Generic | DialectFamily::PostgreSQL => (&[], INFORMATION_SCHEMA),
                DialectFamily::MySQL => (MYSQL, INFORMATION_SCHEMA),
                DialectFamily::SqlServer => (SQLSERVER, INFORMATION_SCHEMA),
                DialectFamily::Hana => (HANA, INFORMATION_SCHEMA),
                DialectFamily::SQLite => (SQLITE, &[]),
                DialectFamily::Oracle => (ORACLE, &[]),
                DialectFamily::DB2 => (DB2, &[]),
                DialectFamily::Cassandra => (CASSANDRA, &[]),
            };
        Self {
            dialect,
            overrides,
            fallback,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Template source for `kind`
    pub fn source(&self, kind: QueryKind) -> Option<&'static str> {
        self.overrides
            .iter()
            .chain(self.fallback)
            .find(|(k, _)| *k == kind)
            .map(|(_, source)| *source)
    }

    /// Parsed template for `kind`
    pub fn template(&self, kind: QueryKind) -> TemplateResult<QueryTemplate> {
        let source = self
            .source(kind)
            .ok_or(TemplateError::Unsupported(kind, self.dialect))?;
        QueryTemplate::parse(source)
    }

    /// Render `kind` with `params`
    pub fn render(&self, kind: QueryKind, params: &Params) -> TemplateResult<String> {
        let sql = self.template(kind)?.render(self.dialect, params)?;
        debug!(dialect = %self.dialect, query = %kind, "rendered base query");
        Ok(sql)
    }
}
