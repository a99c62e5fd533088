//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over bar sources (Yahoo Finance, CSV
//! import, synthetic) so the analysis layer never knows where bars came from
//! and tests can run without a network.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::period::LookbackPeriod;
use crate::domain::BarSeries;
use crate::error::AnalysisError;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("invalid lookback period '{0}' (expected e.g. 5D, 1WK, 6MO, 10Y, YTD, MAX)")]
    InvalidPeriod(String),

    #[error("csv import error: {0}")]
    Csv(String),

    #[error("invalid series: {0}")]
    InvalidSeries(#[from] AnalysisError),

    #[error("data error: {0}")]
    Other(String),
}

/// Where a series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Synthetic,
}

/// Trait for bar providers.
///
/// Implementations return a date-ordered `BarSeries`; the analysis layer
/// treats it as read-only from then on.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Which `DataSource` tag results from this provider carry.
    fn source(&self) -> DataSource;

    /// Fetch daily bars for a symbol over an inclusive date range.
    fn fetch_range(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BarSeries, DataError>;

    /// Fetch daily bars covering `period` back from today.
    fn fetch(&self, symbol: &str, period: LookbackPeriod) -> Result<BarSeries, DataError> {
        let end = chrono::Local::now().date_naive();
        self.fetch_range(symbol, period.start_date(end), end)
    }
}
