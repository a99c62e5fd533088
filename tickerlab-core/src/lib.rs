//! TickerLab Core: single-security technical analysis.
//!
//! This crate holds everything except the command line:
//! - Domain types (bars, bar series, the analysis subject `Ticker`)
//! - Data providers (Yahoo Finance, CSV import, synthetic) and lookback periods
//! - Indicators, led by the parabolic SAR state machine
//! - Return statistics, beta and alpha, and a buy-and-hold profit/loss walk
//! - Renderer-agnostic chart descriptions with JSON/CSV export
//! - The `AnalysisConfig` record of defaults

pub mod chart;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod indicators;
pub mod profit_loss;
pub mod stats;

pub use config::AnalysisConfig;
pub use error::{AnalysisError, ConfigError, ExportError};
