//! Deterministic synthetic bars for offline runs and demos.
//!
//! A random walk from 100.0, seeded from the BLAKE3 hash of the symbol so the
//! same symbol always yields the same series. Clearly fake; results are
//! tagged `DataSource::Synthetic`.

use super::provider::{DataError, DataProvider, DataSource};
use crate::domain::{Bar, BarSeries};
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticProvider;

impl SyntheticProvider {
    pub fn new() -> Self {
        Self
    }
}

/// Generate weekday bars for `symbol` over `[start, end]`.
pub fn generate_bars(symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<Bar> {
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::new();
    let mut price = 100.0_f64;

    for date in start.iter_days().take_while(|d| *d <= end) {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        // Dividend-style drift between close and adjusted close
        let adj_close = close * rng.gen_range(0.99..=1.0);
        let volume = rng.gen_range(500_000..5_000_000u64);

        bars.push(Bar {
            date,
            open,
            high,
            low,
            close,
            adj_close: adj_close.clamp(low, high),
            volume,
        });

        price = close;
    }

    bars
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn source(&self) -> DataSource {
        DataSource::Synthetic
    }

    fn fetch_range(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BarSeries, DataError> {
        let bars = generate_bars(symbol, start, end);
        if bars.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        info!(symbol, bars = bars.len(), "generated SYNTHETIC bars");
        Ok(BarSeries::new(symbol, bars)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        )
    }

    #[test]
    fn synthetic_data_is_deterministic() {
        let (start, end) = range();
        assert_eq!(generate_bars("SPY", start, end), generate_bars("SPY", start, end));
    }

    #[test]
    fn different_symbols_get_different_data() {
        let (start, end) = range();
        let a = generate_bars("SPY", start, end);
        let b = generate_bars("QQQ", start, end);
        assert_ne!(a[5].close, b[5].close);
    }

    #[test]
    fn skips_weekends_and_stays_sane() {
        let (start, end) = range();
        let bars = generate_bars("SPY", start, end);
        assert!(bars
            .iter()
            .all(|b| !matches!(b.date.weekday(), Weekday::Sat | Weekday::Sun)));
        assert!(bars.iter().all(|b| b.is_sane()));
    }

    #[test]
    fn empty_range_is_an_error() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(); // Saturday
        let err = SyntheticProvider::new().fetch_range("SPY", day, day).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { .. }));
    }
}
