//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! Three bands (separate Indicator instances):
//! - Middle: SMA(close, period)
//! - Upper: middle + mult * stddev(close, period)
//! - Lower: middle - mult * stddev(close, period)
//!
//! Uses sample stddev (divide by N - 1).
//! Lookback: period - 1.

use serde::{Deserialize, Serialize};

use super::rolling::{rolling_mean, rolling_std};
use super::{Indicator, PriceField};
use crate::domain::Bar;
use crate::error::AnalysisError;

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

/// All three bands, aligned with the input bars.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub middle: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    field: PriceField,
    name: String,
}

impl Bollinger {
    pub fn new(
        period: usize,
        multiplier: f64,
        band: BollingerBand,
    ) -> Result<Self, AnalysisError> {
        if period < 2 {
            return Err(AnalysisError::invalid(format!(
                "Bollinger period must be >= 2, got {period}"
            )));
        }
        if !(multiplier >= 0.0) || !multiplier.is_finite() {
            return Err(AnalysisError::invalid(format!(
                "Bollinger multiplier must be a non-negative number, got {multiplier}"
            )));
        }
        let label = match band {
            BollingerBand::Upper => "upper",
            BollingerBand::Middle => "middle",
            BollingerBand::Lower => "lower",
        };
        Ok(Self {
            period,
            multiplier,
            band,
            field: PriceField::Close,
            name: format!("bollinger_{label}_{period}_{multiplier}"),
        })
    }

    pub fn upper(period: usize, multiplier: f64) -> Result<Self, AnalysisError> {
        Self::new(period, multiplier, BollingerBand::Upper)
    }

    pub fn middle(period: usize, multiplier: f64) -> Result<Self, AnalysisError> {
        Self::new(period, multiplier, BollingerBand::Middle)
    }

    pub fn lower(period: usize, multiplier: f64) -> Result<Self, AnalysisError> {
        Self::new(period, multiplier, BollingerBand::Lower)
    }

    pub fn on(mut self, field: PriceField) -> Self {
        self.field = field;
        self
    }

    pub fn bands(&self, bars: &[Bar]) -> BollingerBands {
        let prices = self.field.extract(bars);
        let middle = rolling_mean(&prices, self.period, self.period);
        let std = rolling_std(&prices, self.period);
        let upper = middle
            .iter()
            .zip(&std)
            .map(|(m, s)| m + self.multiplier * s)
            .collect();
        let lower = middle
            .iter()
            .zip(&std)
            .map(|(m, s)| m - self.multiplier * s)
            .collect();
        BollingerBands {
            middle,
            upper,
            lower,
        }
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Result<Vec<f64>, AnalysisError> {
        let bands = self.bands(bars);
        Ok(match self.band {
            BollingerBand::Upper => bands.upper,
            BollingerBand::Middle => bands.middle,
            BollingerBand::Lower => bands.lower,
        })
    }
}
