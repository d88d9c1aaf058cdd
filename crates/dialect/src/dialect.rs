// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Dialect Support
//!
//! This module defines the SQL dialects SQLTools has drivers for.
//!
//! ## Design
//!
//! The dialect system is organized into two levels:
//!
//! 1. **Dialect Family**: groupings that share lexical syntax (quoting,
//!    comments, batch separators)
//! 2. **Specific Dialect**: one variant per driver
//!
//! ## Dialect Families
//!
//! - **MySQL Family**: MySQL and MariaDB
//!   - backtick identifiers, `#` comments, backslash escapes in strings
//! - **PostgreSQL Family**: PostgreSQL, CockroachDB and Redshift
//!   - dollar-quoted bodies, nested block comments
//! - **SQL Server**: `GO` batch separators, `[bracket]` identifiers
//!
//! Every other driver is its own family.
//!
//! Drivers are referred to by string ids coming from connection settings
//! and editor language ids, so [`Dialect::from_driver_id`] accepts the usual
//! aliases (`pg`, `postgres`, `sqlserver`, `cql`, `hana`, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::rules::DialectRules;

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Dialect {
    /// Plain SQL with no vendor extensions
    #[default]
    Generic,
    /// MySQL
    MySQL,
    /// MariaDB
    MariaDB,
    /// PostgreSQL
    PostgreSQL,
    /// CockroachDB (PostgreSQL wire compatible)
    CockroachDB,
    /// Amazon Redshift (PostgreSQL derived)
    Redshift,
    /// Microsoft SQL Server / Azure SQL
    MSSQL,
    /// SQLite
    SQLite,
    /// Oracle Database
    Oracle,
    /// IBM DB2
    DB2,
    /// Apache Cassandra (CQL)
    Cassandra,
    /// SAP HANA
    SAPHana,
}

impl Dialect {
    /// All dialects, in declaration order
    pub const ALL: [Dialect; 12] = [
        Dialect::Generic,
        Dialect::MySQL,
        Dialect::MariaDB,
        Dialect::PostgreSQL,
        Dialect::CockroachDB,
        Dialect::Redshift,
        Dialect::MSSQL,
        Dialect::SQLite,
        Dialect::Oracle,
        Dialect::DB2,
        Dialect::Cassandra,
        Dialect::SAPHana,
    ];

    /// Resolve a driver id or editor language id to a dialect.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Returns `None` for unknown ids.
    pub fn from_driver_id(id: &str) -> Option<Self> {
        let id = id.trim().to_ascii_lowercase();
        let dialect = match id.as_str() {
            "generic" | "sql" | "ansi" => Dialect::Generic,
            "mysql" => Dialect::MySQL,
            "mariadb" => Dialect::MariaDB,
            "pg" | "pgsql" | "postgres" | "postgresql" => Dialect::PostgreSQL,
            "cockroachdb" | "cockroach" => Dialect::CockroachDB,
            "redshift" => Dialect::Redshift,
            "mssql" | "sqlserver" | "tsql" | "azuresql" => Dialect::MSSQL,
            "sqlite" | "sqlite3" => Dialect::SQLite,
            "oracle" | "oracledb" | "plsql" => Dialect::Oracle,
            "db2" | "ibmdb2" => Dialect::DB2,
            "cassandra" | "cql" => Dialect::Cassandra,
            "saphana" | "hana" => Dialect::SAPHana,
            _ => return None,
        };
        Some(dialect)
    }

    /// Canonical driver id, as used in connection settings
    pub fn driver_id(&self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::MySQL => "mysql",
            Dialect::MariaDB => "mariadb",
            Dialect::PostgreSQL => "postgresql",
            Dialect::CockroachDB => "cockroachdb",
            Dialect::Redshift => "redshift",
            Dialect::MSSQL => "mssql",
            Dialect::SQLite => "sqlite",
            Dialect::Oracle => "oracle",
            Dialect::DB2 => "db2",
            Dialect::Cassandra => "cassandra",
            Dialect::SAPHana => "saphana",
        }
    }

    /// Returns the family this dialect belongs to
    pub fn family(&self) -> DialectFamily {
        match self {
            Dialect::Generic => DialectFamily::Generic,
            Dialect::MySQL | Dialect::MariaDB => DialectFamily::MySQL,
            Dialect::PostgreSQL | Dialect::CockroachDB | Dialect::Redshift => {
                DialectFamily::PostgreSQL
            }
            Dialect::MSSQL => DialectFamily::SqlServer,
            Dialect::SQLite => DialectFamily::SQLite,
            Dialect::Oracle => DialectFamily::Oracle,
            Dialect::DB2 => DialectFamily::DB2,
            Dialect::Cassandra => DialectFamily::Cassandra,
            Dialect::SAPHana => DialectFamily::Hana,
        }
    }

    /// Lexical rules for this dialect
    pub fn rules(&self) -> DialectRules {
        DialectRules::for_family(self.family())
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.driver_id())
    }
}

impl FromStr for Dialect {
    type Err = DialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::from_driver_id(s).ok_or_else(|| DialectError::UnknownDriver(s.to_string()))
    }
}

/// Dialect family groupings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialectFamily {
    Generic,
    MySQL,
    PostgreSQL,
    SqlServer,
    SQLite,
    Oracle,
    DB2,
    Cassandra,
    Hana,
}

/// Dialect lookup errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialectError {
    /// The driver id does not name a known dialect
    #[error("Unknown driver: {0}")]
    UnknownDriver(String),
}
