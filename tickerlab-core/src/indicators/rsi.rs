//! Relative Strength Index (RSI).
//!
//! Simple rolling means of close-to-close gains and losses:
//! RSI = 100 - 100 / (1 + mean_gain / mean_loss)
//!
//! The first change counts as zero gain and zero loss. Windows are partial
//! until full (min_periods = 1), so the only leading NaN is index 0.
//! Edge cases: mean_loss == 0 → 100; mean_gain == mean_loss == 0 → NaN.

use serde::{Deserialize, Serialize};

use super::rolling::{diff, rolling_mean};
use super::{require_window, Indicator, PriceField};
use crate::domain::Bar;
use crate::error::AnalysisError;

pub const DEFAULT_RSI_WINDOW: usize = 14;

/// Overbought / oversold guide levels drawn with the RSI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiBands {
    pub upper: f64,
    pub lower: f64,
}

impl RsiBands {
    pub fn new(upper: f64, lower: f64) -> Result<Self, AnalysisError> {
        if !(0.0..=100.0).contains(&lower) || !(0.0..=100.0).contains(&upper) || lower >= upper {
            return Err(AnalysisError::invalid(format!(
                "RSI bands need 0 <= lower < upper <= 100, got lower={lower} upper={upper}"
            )));
        }
        Ok(Self { upper, lower })
    }
}

impl Default for RsiBands {
    fn default() -> Self {
        Self {
            upper: 70.0,
            lower: 30.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rsi {
    window: usize,
    field: PriceField,
    name: String,
}

impl Rsi {
    pub fn new(window: usize) -> Result<Self, AnalysisError> {
        require_window("RSI", window)?;
        Ok(Self {
            window,
            field: PriceField::Close,
            name: format!("rsi_{window}"),
        })
    }

    pub fn on(mut self, field: PriceField) -> Self {
        self.field = field;
        self
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute(&self, bars: &[Bar]) -> Result<Vec<f64>, AnalysisError> {
        let changes = diff(&self.field.extract(bars));
        let gains: Vec<f64> = changes
            .iter()
            .map(|&c| if c > 0.0 { c } else { 0.0 })
            .collect();
        let losses: Vec<f64> = changes
            .iter()
            .map(|&c| if c < 0.0 { -c } else { 0.0 })
            .collect();

        let mean_gain = rolling_mean(&gains, self.window, 1);
        let mean_loss = rolling_mean(&losses, self.window, 1);

        Ok(mean_gain
            .iter()
            .zip(&mean_loss)
            .map(|(&g, &l)| rsi_value(g, l))
            .collect())
    }
}

fn rsi_value(mean_gain: f64, mean_loss: f64) -> f64 {
    if mean_loss == 0.0 {
        if mean_gain == 0.0 {
            f64::NAN
        } else {
            100.0
        }
    } else {
        100.0 - 100.0 / (1.0 + mean_gain / mean_loss)
    }
}
