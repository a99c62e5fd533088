//! CSV import provider.
//!
//! Reads `{dir}/{SYMBOL}.csv` files with a header row. Column names are
//! matched case-sensitively against the canonical snake_case names or the
//! common spreadsheet export spellings (`Date`, `Open`, `Adj Close`, ...).
//! A missing adjusted-close column falls back to the close.

use super::provider::{DataError, DataProvider, DataSource};
use crate::domain::{Bar, BarSeries};
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(default, alias = "Adj Close", alias = "adjclose")]
    adj_close: Option<f64>,
    #[serde(default, alias = "Volume")]
    volume: Option<f64>,
}

impl From<CsvRow> for Bar {
    fn from(row: CsvRow) -> Self {
        Bar {
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            adj_close: row.adj_close.unwrap_or(row.close),
            volume: row.volume.map(|v| v.max(0.0) as u64).unwrap_or(0),
        }
    }
}

/// Parse bars from any CSV reader. Rows may appear in any date order.
pub fn read_bars<R: Read>(symbol: &str, reader: R) -> Result<BarSeries, DataError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut bars = Vec::new();
    for (line, row) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = row.map_err(|e| DataError::Csv(format!("{symbol} row {}: {e}", line + 1)))?;
        bars.push(Bar::from(row));
    }
    if bars.is_empty() {
        return Err(DataError::SymbolNotFound {
            symbol: symbol.to_string(),
        });
    }
    Ok(BarSeries::from_unsorted(symbol, bars))
}

/// Load a single CSV file.
pub fn read_bars_file(symbol: &str, path: &Path) -> Result<BarSeries, DataError> {
    debug!(symbol, path = %path.display(), "reading bars from CSV");
    let file = std::fs::File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            }
        } else {
            DataError::Csv(format!("open {}: {e}", path.display()))
        }
    })?;
    read_bars(symbol, file)
}

/// Provider backed by a directory of per-symbol CSV files.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file holding `symbol`: `{dir}/{SYMBOL}.csv`, upper-cased.
    pub fn symbol_path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", symbol.to_uppercase()))
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_import"
    }

    fn source(&self) -> DataSource {
        DataSource::CsvImport
    }

    fn fetch_range(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BarSeries, DataError> {
        let all = read_bars_file(symbol, &self.symbol_path(symbol))?;
        let bars: Vec<Bar> = all
            .bars()
            .iter()
            .filter(|b| b.date >= start && b.date <= end)
            .copied()
            .collect();
        if bars.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        info!(symbol, bars = bars.len(), %start, %end, "loaded bars from CSV");
        Ok(BarSeries::new(symbol, bars)?)
    }
}
