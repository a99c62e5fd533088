//! Error types for analysis, configuration, and export.
//!
//! Data-provider errors live next to the provider trait in `data::provider`.

use thiserror::Error;

/// Errors raised by the pure analysis layer (indicators, statistics, P/L walk).
///
/// Computations fail fast on bad input and never return partial output.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("series for '{0}' and '{1}' share fewer than two dates")]
    InsufficientOverlap(String, String),
}

impl AnalysisError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Errors from loading or validating an `AnalysisConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors from writing chart artifacts.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialize chart JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("write chart CSV: {0}")]
    Csv(#[from] csv::Error),
}
