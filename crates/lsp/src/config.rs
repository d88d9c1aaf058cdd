// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Server Configuration
//!
//! Settings arrive from the client either as `initializationOptions` or in a
//! `workspace/didChangeConfiguration` payload. Both carry the same shape:
//!
//! ```json
//! {
//!   "sqltools": {
//!     "dialect": "pg",
//!     "paramsEnabled": true,
//!     "symbolLabelLength": 60
//!   }
//! }
//! ```
//!
//! Every key is optional. A missing `dialect` means the dialect is taken
//! from the document's language id.

use serde::Deserialize;
use serde_json::Value;
use sqltools_dialect::{Dialect, DialectError};

/// Settings key under which the client nests our options
pub const SETTINGS_KEY: &str = "sqltools";

/// Longest accepted document symbol label
pub const MAX_SYMBOL_LABEL_LENGTH: usize = 500;

/// Runtime configuration of the language server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Dialect forced for every document, overriding the language id
    pub dialect: Option<Dialect>,

    /// Whether `sqltools.queryParameters` is answered
    pub params_enabled: bool,

    /// Document symbol labels are cut to this many characters
    pub symbol_label_length: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            dialect: None,
            params_enabled: true,
            symbol_label_length: 80,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSettings {
    dialect: Option<String>,
    params_enabled: Option<bool>,
    symbol_label_length: Option<usize>,
}

impl ServerConfig {
    /// Parse the `sqltools` section of a client settings payload.
    ///
    /// Returns `Ok(None)` when the payload has no `sqltools` key, so callers
    /// can keep their current configuration.
    pub fn from_lsp_settings(settings: &Value) -> Result<Option<Self>, ConfigError> {
        let Some(section) = settings.get(SETTINGS_KEY) else {
            return Ok(None);
        };
        if section.is_null() {
            return Ok(None);
        }

        let raw: RawSettings = serde_json::from_value(section.clone())
            .map_err(|e| ConfigError::InvalidSettings(e.to_string()))?;

        let defaults = Self::default();
        let dialect = match raw.dialect.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(id) => Some(id.parse::<Dialect>()?),
        };

        let config = Self {
            dialect,
            params_enabled: raw.params_enabled.unwrap_or(defaults.params_enabled),
            symbol_label_length: raw
                .symbol_label_length
                .unwrap_or(defaults.symbol_label_length),
        };
        config.validate()?;

        Ok(Some(config))
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbol_label_length == 0 || self.symbol_label_length > MAX_SYMBOL_LABEL_LENGTH {
            return Err(ConfigError::InvalidSymbolLabelLength(
                self.symbol_label_length,
            ));
        }
        Ok(())
    }

    /// Dialect for a document: configured dialect, then the language id,
    /// then [`Dialect::Generic`].
    pub fn resolve_dialect(&self, language_id: &str) -> Dialect {
        if let Some(dialect) = self.dialect {
            return dialect;
        }
        Dialect::from_driver_id(language_id).unwrap_or_default()
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Unknown `dialect` value
    #[error(transparent)]
    Dialect(#[from] DialectError),

    /// Settings object has the wrong shape
    #[error("Invalid sqltools settings: {0}")]
    InvalidSettings(String),

    #[error("symbolLabelLength must be between 1 and {max}, got {0}", max = MAX_SYMBOL_LABEL_LENGTH)]
    InvalidSymbolLabelLength(usize),
}
