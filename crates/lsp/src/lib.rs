// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQLTools Language Server
//!
//! A small tower-lsp server that exposes the statement splitter to editors.
//!
//! ## Overview
//!
//! - statements as document symbols, grouped by `-- @block` name
//! - `@block` regions as folding ranges
//! - warnings for literals and comments left open at end of input
//! - commands returning the statement or block under the cursor, all
//!   statements of a document, or its query parameters
//!
//! ## Starting the Server
//!
//! ```rust,no_run
//! use sqltools_lsp::LspBackend;
//! use tower_lsp::{LspService, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (service, socket) = LspService::new(LspBackend::new);
//!     Server::new(tokio::io::stdin(), tokio::io::stdout(), socket)
//!         .serve(service)
//!         .await;
//! }
//! ```
//!
//! ## Configuration
//!
//! ```json
//! {
//!   "sqltools": {
//!     "dialect": "mssql",
//!     "paramsEnabled": true,
//!     "symbolLabelLength": 80
//!   }
//! }
//! ```
//!
//! Without a configured dialect, each document's language id picks one
//! (`mysql`, `pgsql`, `sqlite`, ...), falling back to the generic dialect.
//!
//! ## Modules
//!
//! - [`backend`]: `LanguageServer` implementation
//! - [`document`]: rope-backed document store and position conversion
//! - [`config`]: client settings
//! - [`commands`]: `workspace/executeCommand` handlers
//! - [`symbols`]: document symbols and folding ranges
//! - [`diagnostic`]: lexical warnings

pub mod backend;
pub mod commands;
pub mod config;
pub mod diagnostic;
pub mod document;
pub mod symbols;

pub use backend::{LspBackend, LspError, server_capabilities};
pub use commands::{CommandArgs, execute};
pub use config::{ConfigError, ServerConfig};
pub use diagnostic::{DiagnosticCode, SqlDiagnostic, collect_diagnostics};
pub use document::{Document, DocumentError, DocumentMetadata, DocumentStore};
pub use symbols::{document_symbols, folding_ranges};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server name
pub const SERVER_NAME: &str = "sqltools-ls";
