// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Field Mapping
//!
//! Catalog queries return the same facts under vendor-specific names. The
//! tables below map vendor field names onto the normalized vocabulary:
//!
//! | normalized     | meaning                          |
//! |----------------|----------------------------------|
//! | `label`        | object name                      |
//! | `schema`       | owning schema / keyspace         |
//! | `database`     | owning database / catalog        |
//! | `table`        | owning table (columns)           |
//! | `isView`       | table is a view                  |
//! | `dataType`     | column type                      |
//! | `size`         | column length                    |
//! | `isNullable`   | column accepts NULL              |
//! | `isPk`         | column is part of the primary key|
//! | `defaultValue` | column default                   |
//!
//! Vendor names are matched case-insensitively. Family rules are consulted
//! before the common rules; fields matched by neither pass through as-is.

use serde::Serialize;
use serde_json::Value;
use sqltools_dialect::{Dialect, DialectFamily};

use crate::result::Row;

/// What a catalog row describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MetadataKind {
    Schema,
    Table,
    Column,
}

/// Value conversion applied while renaming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Conversion {
    /// Keep the value
    None,
    /// Coerce `YES`/`1`/`t`/`true` style flags to a boolean
    Bool,
    /// Boolean coercion, then negation (`notnull` -> `isNullable`)
    InvertedBool,
}

/// One row of a mapping table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldRule {
    pub vendor: &'static str,
    pub field: &'static str,
    pub convert: Conversion,
}

const fn rule(vendor: &'static str, field: &'static str) -> FieldRule {
    FieldRule {
        vendor,
        field,
        convert: Conversion::None,
    }
}

const fn flag(vendor: &'static str, field: &'static str) -> FieldRule {
    FieldRule {
        vendor,
        field,
        convert: Conversion::Bool,
    }
}

const fn inverted(vendor: &'static str, field: &'static str) -> FieldRule {
    FieldRule {
        vendor,
        field,
        convert: Conversion::InvertedBool,
    }
}

const COMMON_SCHEMA: &[FieldRule] = &[
    rule("schema_name", "label"),
    rule("catalog_name", "database"),
    rule("schema", "label"),
];

const COMMON_TABLE: &[FieldRule] = &[
    rule("table_name", "label"),
    rule("table_schema", "schema"),
    rule("table_catalog", "database"),
    flag("isview", "isView"),
    flag("is_view", "isView"),
    rule("tablename", "label"),
    rule("tableschema", "schema"),
];

const COMMON_COLUMN: &[FieldRule] = &[
    rule("column_name", "label"),
    rule("table_name", "table"),
    rule("table_schema", "schema"),
    rule("table_catalog", "database"),
    rule("data_type", "dataType"),
    rule("character_maximum_length", "size"),
    flag("is_nullable", "isNullable"),
    rule("column_default", "defaultValue"),
    flag("ispk", "isPk"),
    flag("is_pk", "isPk"),
];

const MYSQL_TABLE: &[FieldRule] = &[rule("table_type", "type")];

const MYSQL_COLUMN: &[FieldRule] = &[rule("column_type", "type"), rule("column_key", "key")];

const POSTGRES_TABLE: &[FieldRule] = &[rule("relname", "label"), rule("nspname", "schema")];

const POSTGRES_COLUMN: &[FieldRule] = &[rule("attname", "label"), rule("udt_name", "type")];

const SQLSERVER_TABLE: &[FieldRule] = &[rule("name", "label"), rule("type_desc", "type")];

const SQLITE_TABLE: &[FieldRule] = &[rule("name", "label"), rule("tbl_name", "table")];

const SQLITE_COLUMN: &[FieldRule] = &[
    rule("name", "label"),
    rule("type", "dataType"),
    inverted("notnull", "isNullable"),
    rule("dflt_value", "defaultValue"),
    flag("pk", "isPk"),
];

const ORACLE_SCHEMA: &[FieldRule] = &[rule("username", "label")];

const ORACLE_TABLE: &[FieldRule] = &[rule("owner", "schema"), rule("object_type", "type")];

const ORACLE_COLUMN: &[FieldRule] = &[
    rule("owner", "schema"),
    rule("data_length", "size"),
    flag("nullable", "isNullable"),
    rule("data_default", "defaultValue"),
];

const DB2_SCHEMA: &[FieldRule] = &[rule("schemaname", "label")];

const DB2_TABLE: &[FieldRule] = &[
    rule("tabname", "label"),
    rule("tabschema", "schema"),
    rule("type", "type"),
];

const DB2_COLUMN: &[FieldRule] = &[
    rule("colname", "label"),
    rule("tabname", "table"),
    rule("tabschema", "schema"),
    rule("typename", "dataType"),
    rule("length", "size"),
    flag("nulls", "isNullable"),
    rule("default", "defaultValue"),
];

const CASSANDRA_SCHEMA: &[FieldRule] = &[rule("keyspace_name", "label")];

const CASSANDRA_TABLE: &[FieldRule] = &[rule("keyspace_name", "schema")];

const CASSANDRA_COLUMN: &[FieldRule] = &[
    rule("keyspace_name", "schema"),
    rule("type", "dataType"),
    rule("kind", "key"),
];

const HANA_TABLE: &[FieldRule] = &[rule("schema_name", "schema"), rule("view_name", "label")];

const HANA_COLUMN: &[FieldRule] = &[
    rule("schema_name", "schema"),
    rule("data_type_name", "dataType"),
    rule("length", "size"),
    rule("default_value", "defaultValue"),
];

/// Family-specific rules for `kind`, consulted before the common ones
fn family_rules(family: DialectFamily, kind: MetadataKind) -> &'static [FieldRule] {
    use MetadataKind::*;
    match (family, kind) {
        (DialectFamily::MySQL, Table) => MYSQL_TABLE,
        (DialectFamily::MySQL, Column) => MYSQL_COLUMN,
        (DialectFamily::PostgreSQL, Table) => POSTGRES_TABLE,
        (DialectFamily::PostgreSQL, Column) => POSTGRES_COLUMN,
        (DialectFamily::SqlServer, Table) => SQLSERVER_TABLE,
        (DialectFamily::SQLite, Table) => SQLITE_TABLE,
        (DialectFamily::SQLite, Column) => SQLITE_COLUMN,
        (DialectFamily::Oracle, Schema) => ORACLE_SCHEMA,
        (DialectFamily::Oracle, Table) => ORACLE_TABLE,
        (DialectFamily::Oracle, Column) => ORACLE_COLUMN,
        (DialectFamily::DB2, Schema) => DB2_SCHEMA,
        (DialectFamily::DB2, Table) => DB2_TABLE,
        (DialectFamily::DB2, Column) => DB2_COLUMN,
        (DialectFamily::Cassandra, Schema) => CASSANDRA_SCHEMA,
        (DialectFamily::Cassandra, Table) => CASSANDRA_TABLE,
        (DialectFamily::Cassandra, Column) => CASSANDRA_COLUMN,
        (DialectFamily::Hana, Table) => HANA_TABLE,
        (DialectFamily::Hana, Column) => HANA_COLUMN,
        _ => &[],
    }
}

fn common_rules(kind: MetadataKind) -> &'static [FieldRule] {
    match kind {
        MetadataKind::Schema => COMMON_SCHEMA,
        MetadataKind::Table => COMMON_TABLE,
        MetadataKind::Column => COMMON_COLUMN,
    }
}

/// Rules applying to `kind` rows from `dialect`, in lookup order
pub fn field_rules(dialect: Dialect, kind: MetadataKind) -> impl Iterator<Item = &'static FieldRule> {
    family_rules(dialect.family(), kind)
        .iter()
        .chain(common_rules(kind))
}

/// Rename and convert the fields of one catalog row
///
/// When two vendor fields map to the same normalized name the first one
/// in row order wins.
pub fn normalize_row(dialect: Dialect, kind: MetadataKind, row: &Row) -> Row {
    let mut out = Row::new();
    for (name, value) in row {
        let matched = field_rules(dialect, kind).find(|r| r.vendor.eq_ignore_ascii_case(name));
        let (field, value) = match matched {
            Some(rule) => (rule.field.to_string(), convert(value, rule.convert)),
            None => (name.clone(), value.clone()),
        };
        out.entry(field).or_insert(value);
    }
    out
}

fn convert(value: &Value, conversion: Conversion) -> Value {
    match conversion {
        Conversion::None => value.clone(),
        Conversion::Bool => as_flag(value).map_or_else(|| value.clone(), Value::Bool),
        Conversion::InvertedBool => as_flag(value).map_or_else(|| value.clone(), |b| Value::Bool(!b)),
    }
}

fn as_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" | "t" | "1" | "view" => Some(true),
            "no" | "n" | "false" | "f" | "0" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
