//! Exponential Moving Average (EMA).
//!
//! alpha = 2 / (span + 1), seeded with the first price:
//! EMA[0] = price[0], EMA[t] = alpha * price[t] + (1 - alpha) * EMA[t-1].
//! Lookback: 0. A NaN price poisons every later value.

use super::rolling::ewm_recursive;
use super::{require_window, Indicator, PriceField};
use crate::domain::Bar;
use crate::error::AnalysisError;

#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    field: PriceField,
    name: String,
}

impl Ema {
    pub fn new(span: usize) -> Result<Self, AnalysisError> {
        require_window("EMA", span)?;
        Ok(Self {
            span,
            field: PriceField::AdjClose,
            name: format!("ema_{span}"),
        })
    }

    /// Read `field` instead of the adjusted close.
    pub fn on(mut self, field: PriceField) -> Self {
        self.field = field;
        self
    }

    pub fn span(&self) -> usize {
        self.span
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Result<Vec<f64>, AnalysisError> {
        Ok(ewm_recursive(&self.field.extract(bars), self.span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn ema_span_1_equals_price() {
        let bars = make_bars(&[100.0, 200.0, 300.0]);
        let result = Ema::new(1).unwrap().compute(&bars).unwrap();
        assert_approx(result[0], 100.0, DEFAULT_EPSILON);
        assert_approx(result[1], 200.0, DEFAULT_EPSILON);
        assert_approx(result[2], 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_3_known_values() {
        // alpha = 2/(3+1) = 0.5, seeded with the first price
        // EMA = 10, 10.5, 11.25, 12.125
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0]);
        let result = Ema::new(3).unwrap().compute(&bars).unwrap();
        assert_approx(result[0], 10.0, DEFAULT_EPSILON);
        assert_approx(result[1], 10.5, DEFAULT_EPSILON);
        assert_approx(result[2], 11.25, DEFAULT_EPSILON);
        assert_approx(result[3], 12.125, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_nan_propagates_forward() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0, 13.0]);
        bars[1].adj_close = f64::NAN;
        let result = Ema::new(3).unwrap().compute(&bars).unwrap();
        assert_approx(result[0], 10.0, DEFAULT_EPSILON);
        assert!(result[1..].iter().all(|v| v.is_nan()));
    }

    #[test]
    fn ema_lookback_and_validation() {
        assert_eq!(Ema::new(20).unwrap().lookback(), 0);
        assert_eq!(Ema::new(20).unwrap().name(), "ema_20");
        assert!(Ema::new(0).is_err());
    }
}
