// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # LSP Backend Implementation
//!
//! The backend wires tower-lsp requests to the document store and the
//! splitter.
//!
//! ## Architecture
//!
//! ```text
//! Client → LSP Backend → Document Store (ropey)
//!                ↓
//!          Server Config ──→ dialect per document
//!                ↓
//!     symbols / folding / diagnostics / commands
//!                ↓
//!        sqltools-splitter
//! ```
//!
//! ## Supported LSP Features
//!
//! - textDocument/didOpen, didChange (incremental), didClose
//! - textDocument/documentSymbol
//! - textDocument/foldingRange
//! - textDocument/publishDiagnostics (unterminated literals and comments)
//! - workspace/executeCommand (see [`crate::commands`])
//! - workspace/didChangeConfiguration

use std::sync::Arc;

use serde_json::Value;
use sqltools_dialect::DialectError;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::{self, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{error, info, warn};

use crate::commands::{self, COMMANDS};
use crate::config::{ConfigError, ServerConfig};
use crate::diagnostic::publish_diagnostics_for_document;
use crate::document::{DocumentError, DocumentStore};
use crate::symbols::{document_symbols, folding_ranges};
use crate::{SERVER_NAME, VERSION};

/// LSP backend implementation
pub struct LspBackend {
    /// LSP client for sending notifications and requests
    client: Client,

    /// Open documents
    documents: Arc<DocumentStore>,

    /// Current configuration, replaced wholesale on each settings change
    config: Arc<RwLock<ServerConfig>>,
}

impl LspBackend {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: Arc::new(DocumentStore::new()),
            config: Arc::new(RwLock::new(ServerConfig::default())),
        }
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub async fn config(&self) -> ServerConfig {
        self.config.read().await.clone()
    }

    pub async fn set_config(&self, config: ServerConfig) {
        info!(
            "Server configuration updated: dialect={:?}, params_enabled={}",
            config.dialect, config.params_enabled
        );
        *self.config.write().await = config;
    }

    /// Apply a settings payload, keeping the current config if it is invalid
    async fn apply_settings(&self, settings: &Value) {
        match ServerConfig::from_lsp_settings(settings) {
            Ok(Some(config)) => self.set_config(config).await,
            Ok(None) => {}
            Err(e) => {
                warn!("Ignoring invalid settings: {}", e);
                self.client
                    .show_message(MessageType::WARNING, format!("SQLTools: {}", e))
                    .await;
            }
        }
    }

    async fn publish_diagnostics(&self, uri: &Url) {
        let Some(document) = self.documents.get_document(uri).await else {
            return;
        };
        let dialect = self.config().await.resolve_dialect(document.language_id());
        publish_diagnostics_for_document(&self.client, uri.clone(), &document, dialect).await;
    }

    /// Re-publish diagnostics for every open document
    async fn refresh_all(&self) {
        for uri in self.documents.list_uris().await {
            self.publish_diagnostics(&uri).await;
        }
    }
}

/// Capabilities announced in the `initialize` response
pub fn server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Kind(
            TextDocumentSyncKind::INCREMENTAL,
        )),
        document_symbol_provider: Some(OneOf::Left(true)),
        folding_range_provider: Some(FoldingRangeProviderCapability::Simple(true)),
        execute_command_provider: Some(ExecuteCommandOptions {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
            work_done_progress_options: WorkDoneProgressOptions {
                work_done_progress: Some(false),
            },
        }),
        ..Default::default()
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for LspBackend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("Initializing LSP server");
        info!("Client info: {:?}", params.client_info);

        if let Some(options) = &params.initialization_options {
            self.apply_settings(options).await;
        }

        Ok(InitializeResult {
            capabilities: server_capabilities(),
            server_info: Some(ServerInfo {
                name: SERVER_NAME.to_string(),
                version: Some(VERSION.to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        info!("LSP server initialized successfully");
        self.client
            .log_message(MessageType::INFO, format!("{} {} ready", SERVER_NAME, VERSION))
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Shutting down LSP server");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        let uri = doc.uri.clone();

        info!(
            "Document opened: uri={}, language={}, version={}",
            uri, doc.language_id, doc.version
        );

        match self
            .documents
            .open_document(uri.clone(), doc.text, doc.version, doc.language_id)
            .await
        {
            Ok(()) => self.publish_diagnostics(&uri).await,
            Err(e) => error!("Failed to open document: {}", e),
        }
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let identifier = params.text_document;
        let changes = params.content_changes;

        info!(
            "Document changed: uri={}, version={}, changes={}",
            identifier.uri,
            identifier.version,
            changes.len()
        );

        match self.documents.update_document(&identifier, &changes).await {
            Ok(()) => self.publish_diagnostics(&identifier.uri).await,
            Err(DocumentError::DocumentNotFound(uri)) => {
                warn!("Document not found for change: {}", uri);
            }
            Err(e) => {
                error!("Failed to update document: {}", e);
                self.client
                    .show_message(
                        MessageType::ERROR,
                        format!("Failed to update document: {}", e),
                    )
                    .await;
            }
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        info!("Document closed: uri={}", uri);

        if self.documents.close_document(&uri).await {
            self.client.publish_diagnostics(uri, Vec::new(), None).await;
        } else {
            warn!("Closed a document that was never opened: {}", uri);
        }
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        let uri = params.text_document.uri;
        let Some(document) = self.documents.get_document(&uri).await else {
            return Ok(None);
        };

        let config = self.config().await;
        let dialect = config.resolve_dialect(document.language_id());
        let symbols = document_symbols(&document, dialect, config.symbol_label_length);

        Ok(Some(DocumentSymbolResponse::Nested(symbols)))
    }

    async fn folding_range(&self, params: FoldingRangeParams) -> Result<Option<Vec<FoldingRange>>> {
        let uri = params.text_document.uri;
        let Some(document) = self.documents.get_document(&uri).await else {
            return Ok(None);
        };

        let dialect = self.config().await.resolve_dialect(document.language_id());
        Ok(Some(folding_ranges(&document, dialect)))
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        info!("Executing command: {}", params.command);

        let config = self.config().await;
        commands::execute(&params.command, &params.arguments, &self.documents, &config)
            .await
            .map(Some)
            .map_err(|e| {
                warn!("Command {} failed: {}", params.command, e);
                jsonrpc::Error::from(e)
            })
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        info!("Configuration changed");
        self.apply_settings(&params.settings).await;
        self.refresh_all().await;
    }
}

/// LSP backend errors
#[derive(Debug, thiserror::Error)]
pub enum LspError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Dialect(#[from] DialectError),

    #[error("Document is not open: {0}")]
    DocumentNotFound(Url),

    #[error("Missing command argument: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid command arguments: {0}")]
    InvalidArguments(String),

    #[error("Position {}:{} is outside the document", .0.line, .0.character)]
    InvalidPosition(Position),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Turned off by configuration
    #[error("Command is disabled: {0}")]
    CommandDisabled(String),

    #[error("Failed to serialize result: {0}")]
    Serialization(String),
}

impl From<LspError> for jsonrpc::Error {
    fn from(err: LspError) -> Self {
        match err {
            LspError::UnknownCommand(_) => jsonrpc::Error {
                message: err.to_string().into(),
                ..jsonrpc::Error::method_not_found()
            },
            LspError::Serialization(_) => jsonrpc::Error {
                message: err.to_string().into(),
                ..jsonrpc::Error::internal_error()
            },
            _ => jsonrpc::Error::invalid_params(err.to_string()),
        }
    }
}
