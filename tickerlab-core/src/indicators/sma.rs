//! Simple Moving Average (SMA).
//!
//! Rolling mean of adjusted close over a lookback window.
//! Lookback: window - 1 (first valid value at index window-1).
//! Any NaN inside the window yields NaN.

use super::rolling::rolling_mean;
use super::{require_window, Indicator, PriceField};
use crate::domain::Bar;
use crate::error::AnalysisError;

#[derive(Debug, Clone)]
pub struct Sma {
    window: usize,
    field: PriceField,
    name: String,
}

impl Sma {
    pub fn new(window: usize) -> Result<Self, AnalysisError> {
        require_window("SMA", window)?;
        Ok(Self {
            window,
            field: PriceField::AdjClose,
            name: format!("sma_{window}"),
        })
    }

    /// Read `field` instead of the adjusted close.
    pub fn on(mut self, field: PriceField) -> Self {
        self.field = field;
        self
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window - 1
    }

    fn compute(&self, bars: &[Bar]) -> Result<Vec<f64>, AnalysisError> {
        Ok(rolling_mean(&self.field.extract(bars), self.window, self.window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn sma_5_basic() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0]);
        let result = Sma::new(5).unwrap().compute(&bars).unwrap();

        assert_eq!(result.len(), 7);
        for (i, v) in result.iter().take(4).enumerate() {
            assert!(v.is_nan(), "expected NaN at index {i}");
        }
        // SMA[4] = mean(10,11,12,13,14) = 12.0
        assert_approx(result[4], 12.0, DEFAULT_EPSILON);
        assert_approx(result[5], 13.0, DEFAULT_EPSILON);
        assert_approx(result[6], 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_reads_adjusted_close_by_default() {
        let mut bars = make_bars(&[10.0, 10.0]);
        bars[0].adj_close = 8.0;
        bars[1].adj_close = 9.0;
        let result = Sma::new(2).unwrap().compute(&bars).unwrap();
        assert_approx(result[1], 8.5, DEFAULT_EPSILON);

        let on_close = Sma::new(2).unwrap().on(PriceField::Close).compute(&bars).unwrap();
        assert_approx(on_close[1], 10.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_nan_propagation() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
        bars[2].adj_close = f64::NAN;
        let result = Sma::new(3).unwrap().compute(&bars).unwrap();
        // Windows touching index 2 are NaN
        assert!(result[2].is_nan());
        assert!(result[3].is_nan());
        assert!(result[4].is_nan());
        // Index 5 window [13,14,15] → 14.0
        assert_approx(result[5], 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_lookback_and_validation() {
        assert_eq!(Sma::new(20).unwrap().lookback(), 19);
        assert_eq!(Sma::new(1).unwrap().lookback(), 0);
        assert!(Sma::new(0).is_err());
    }

    #[test]
    fn sma_too_few_bars() {
        let bars = make_bars(&[10.0, 11.0]);
        let result = Sma::new(5).unwrap().compute(&bars).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|v| v.is_nan()));
    }
}
