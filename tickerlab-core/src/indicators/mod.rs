//! Technical indicators.
//!
//! Indicators are immutable parameter objects: bar history in, a numeric
//! column out, aligned index-for-index with the bars. The first `lookback()`
//! values are `NaN` while the window fills.
//!
//! Multi-series indicators (Bollinger, MACD) are exposed as separate named
//! instances per component, keeping the single-column `Indicator` trait.

pub mod bollinger;
pub mod ema;
pub mod frame;
pub mod macd;
pub mod parabolic_sar;
pub mod rolling;
pub mod rsi;
pub mod sma;

pub use bollinger::{Bollinger, BollingerBand, BollingerBands};
pub use ema::Ema;
pub use frame::IndicatorFrame;
pub use macd::{Macd, MacdComponent, MacdLines};
pub use parabolic_sar::{ParabolicSar, PsarState, PsarStep, Trend};
pub use rsi::Rsi;
pub use sma::Sma;

use serde::{Deserialize, Serialize};

use crate::domain::Bar;
use crate::error::AnalysisError;

/// A column derived from a bar series.
///
/// # Look-ahead guard
/// No value at bar t may depend on bars after t: computing over a truncated
/// series must reproduce the prefix of the full computation.
pub trait Indicator: Send + Sync {
    /// Column name (e.g. "sma_20", "rsi_14").
    fn name(&self) -> &str;

    /// Number of leading bars without a defined value.
    fn lookback(&self) -> usize;

    /// Compute the column for the whole series. Same length as `bars`.
    fn compute(&self, bars: &[Bar]) -> Result<Vec<f64>, AnalysisError>;
}

/// Which price an indicator reads from each bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    #[default]
    Close,
    AdjClose,
}

impl PriceField {
    pub fn of(self, bar: &Bar) -> f64 {
        match self {
            PriceField::Close => bar.close,
            PriceField::AdjClose => bar.adj_close,
        }
    }

    pub fn extract(self, bars: &[Bar]) -> Vec<f64> {
        bars.iter().map(|b| self.of(b)).collect()
    }
}

/// Simple or exponential moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovingAverageKind {
    #[default]
    Simple,
    Exponential,
}

impl MovingAverageKind {
    pub fn indicator(self, window: usize) -> Result<Box<dyn Indicator>, AnalysisError> {
        Ok(match self {
            MovingAverageKind::Simple => Box::new(Sma::new(window)?),
            MovingAverageKind::Exponential => Box::new(Ema::new(window)?),
        })
    }
}

/// One moving-average column per window, in the order given, as `(name, values)`.
pub fn moving_averages(
    bars: &[Bar],
    kind: MovingAverageKind,
    windows: &[usize],
) -> Result<Vec<(String, Vec<f64>)>, AnalysisError> {
    windows
        .iter()
        .map(|&w| {
            let ma = kind.indicator(w)?;
            Ok((ma.name().to_string(), ma.compute(bars)?))
        })
        .collect()
}

fn require_window(what: &str, window: usize) -> Result<(), AnalysisError> {
    if window == 0 {
        return Err(AnalysisError::invalid(format!("{what} window must be >= 1")));
    }
    Ok(())
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
/// Adjusted close equals close.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                adj_close: close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
