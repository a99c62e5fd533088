//! Moving Average Convergence Divergence (MACD).
//!
//! MACD line = EWM(price, fast) - EWM(price, slow)
//! Signal    = EWM(MACD line, signal)
//! Histogram = MACD line - signal
//!
//! All three use the bias-adjusted exponentially weighted mean with
//! `min_periods` equal to the span, over adjusted close.
//! Lookback: slow - 1 for the line, slow + signal - 2 for signal and histogram.

use serde::{Deserialize, Serialize};

use super::rolling::ewm_adjusted;
use super::{require_window, Indicator, PriceField};
use crate::domain::Bar;
use crate::error::AnalysisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MacdComponent {
    Line,
    Signal,
    Histogram,
}

/// All three MACD series, aligned with the input bars.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdLines {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    component: MacdComponent,
    field: PriceField,
    name: String,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Result<Self, AnalysisError> {
        require_window("MACD fast", fast)?;
        require_window("MACD slow", slow)?;
        require_window("MACD signal", signal)?;
        if fast >= slow {
            return Err(AnalysisError::invalid(format!(
                "MACD fast span ({fast}) must be shorter than slow span ({slow})"
            )));
        }
        Ok(Self {
            fast,
            slow,
            signal,
            component: MacdComponent::Line,
            field: PriceField::AdjClose,
            name: format!("macd_{fast}_{slow}_{signal}"),
        })
    }

    /// Select which series `Indicator::compute` returns.
    pub fn component(mut self, component: MacdComponent) -> Self {
        let (f, s, g) = (self.fast, self.slow, self.signal);
        self.name = match component {
            MacdComponent::Line => format!("macd_{f}_{s}_{g}"),
            MacdComponent::Signal => format!("macd_signal_{f}_{s}_{g}"),
            MacdComponent::Histogram => format!("macd_hist_{f}_{s}_{g}"),
        };
        self.component = component;
        self
    }

    pub fn on(mut self, field: PriceField) -> Self {
        self.field = field;
        self
    }

    pub fn lines(&self, bars: &[Bar]) -> MacdLines {
        let prices = self.field.extract(bars);
        let fast = ewm_adjusted(&prices, self.fast, self.fast);
        let slow = ewm_adjusted(&prices, self.slow, self.slow);
        let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ewm_adjusted(&macd, self.signal, self.signal);
        let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();
        MacdLines {
            macd,
            signal,
            histogram,
        }
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.component {
            MacdComponent::Line => self.slow - 1,
            MacdComponent::Signal | MacdComponent::Histogram => self.slow + self.signal - 2,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Result<Vec<f64>, AnalysisError> {
        let lines = self.lines(bars);
        Ok(match self.component {
            MacdComponent::Line => lines.macd,
            MacdComponent::Signal => lines.signal,
            MacdComponent::Histogram => lines.histogram,
        })
    }
}
