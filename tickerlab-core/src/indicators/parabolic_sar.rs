//! Parabolic SAR: trailing stop-and-reverse level.
//!
//! Sequential state machine over (trend, acceleration factor, extreme point,
//! carried stop). Starts in an up trend with the stop and the extreme at the
//! first bar's high.
//!
//! When a bar extends the extreme point, the emitted stop is the carried one,
//! not a fresh recomputation. Otherwise the stop moves toward the extreme by
//! the acceleration factor and is floored at `min(high, low)` of the bar. A bar
//! breaking through the stop flips the trend for the following bar; the value
//! emitted for the breaking bar is still the pre-flip stop.
//!
//! Parameters: acceleration step (default 0.02), max acceleration (default 0.2).
//! Output: one value per bar from index 1 onward.

use serde::{Deserialize, Serialize};

use super::Indicator;
use crate::domain::Bar;
use crate::error::AnalysisError;

pub const DEFAULT_ACCELERATION_STEP: f64 = 0.02;
pub const DEFAULT_MAX_ACCELERATION: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
}

/// Engine state carried from one bar to the next.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PsarState {
    pub trend: Trend,
    pub acceleration_factor: f64,
    pub extreme_point: f64,
    pub current_sar: f64,
}

/// One processed bar: the emitted stop and the state carried into the next bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PsarStep {
    pub index: usize,
    pub value: f64,
    /// The bar set a new extreme point, so `value` is the carried stop.
    pub extended: bool,
    /// The bar broke through `value` and flipped the trend.
    pub reversed: bool,
    pub state: PsarState,
}

#[derive(Debug, Clone)]
pub struct ParabolicSar {
    acceleration_step: f64,
    max_acceleration: f64,
    name: String,
}

impl ParabolicSar {
    pub fn new(acceleration_step: f64, max_acceleration: f64) -> Result<Self, AnalysisError> {
        validate(acceleration_step, max_acceleration)?;
        Ok(Self {
            acceleration_step,
            max_acceleration,
            name: format!("psar_{acceleration_step}_{max_acceleration}"),
        })
    }

    pub fn acceleration_step(&self) -> f64 {
        self.acceleration_step
    }

    pub fn max_acceleration(&self) -> f64 {
        self.max_acceleration
    }

    /// Stop levels for bars `1..len`.
    pub fn stops(&self, bars: &[Bar]) -> Result<Vec<f64>, AnalysisError> {
        Ok(self.trace(bars)?.into_iter().map(|s| s.value).collect())
    }

    /// Full per-bar trace for bars `1..len`.
    pub fn trace(&self, bars: &[Bar]) -> Result<Vec<PsarStep>, AnalysisError> {
        if bars.len() < 2 {
            return Err(AnalysisError::invalid(format!(
                "parabolic SAR needs at least 2 bars, got {}",
                bars.len()
            )));
        }

        let mut state = initial_state(&bars[0], self.acceleration_step);
        let mut steps = Vec::with_capacity(bars.len() - 1);
        for (index, bar) in bars.iter().enumerate().skip(1) {
            let step = self.advance(&mut state, bar);
            steps.push(PsarStep {
                index,
                value: step.0,
                extended: step.1,
                reversed: step.2,
                state,
            });
        }
        Ok(steps)
    }

    /// Process one bar. Returns (emitted value, extended, reversed).
    fn advance(&self, state: &mut PsarState, bar: &Bar) -> (f64, bool, bool) {
        let floor = bar.high.min(bar.low);
        let extended;
        let provisional;

        match state.trend {
            Trend::Up => {
                if bar.high > state.extreme_point {
                    state.extreme_point = bar.high;
                    state.acceleration_factor = self.bump(state.acceleration_factor);
                    extended = true;
                    provisional = state.current_sar;
                } else {
                    let moved = state.current_sar
                        + state.acceleration_factor * (state.extreme_point - state.current_sar);
                    extended = false;
                    provisional = moved.max(floor);
                }
            }
            Trend::Down => {
                if bar.low < state.extreme_point {
                    state.extreme_point = bar.low;
                    state.acceleration_factor = self.bump(state.acceleration_factor);
                    extended = true;
                    provisional = state.current_sar;
                } else {
                    let moved = state.current_sar
                        - state.acceleration_factor * (state.current_sar - state.extreme_point);
                    extended = false;
                    provisional = moved.max(floor);
                }
            }
        }

        let reversed = match state.trend {
            Trend::Up if bar.low < provisional => {
                *state = PsarState {
                    trend: Trend::Down,
                    acceleration_factor: self.acceleration_step,
                    extreme_point: bar.low,
                    current_sar: bar.low,
                };
                true
            }
            Trend::Down if bar.high > provisional => {
                *state = PsarState {
                    trend: Trend::Up,
                    acceleration_factor: self.acceleration_step,
                    extreme_point: bar.high,
                    current_sar: bar.high,
                };
                true
            }
            _ => {
                state.current_sar = provisional;
                false
            }
        };

        (provisional, extended, reversed)
    }

    fn bump(&self, af: f64) -> f64 {
        (af + self.acceleration_step).min(self.max_acceleration)
    }
}

impl Default for ParabolicSar {
    fn default() -> Self {
        Self {
            acceleration_step: DEFAULT_ACCELERATION_STEP,
            max_acceleration: DEFAULT_MAX_ACCELERATION,
            name: format!("psar_{DEFAULT_ACCELERATION_STEP}_{DEFAULT_MAX_ACCELERATION}"),
        }
    }
}

impl Indicator for ParabolicSar {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        1
    }

    /// Stops aligned to `bars`, with `NaN` at index 0.
    fn compute(&self, bars: &[Bar]) -> Result<Vec<f64>, AnalysisError> {
        let mut result = Vec::with_capacity(bars.len());
        result.push(f64::NAN);
        result.extend(self.stops(bars)?);
        Ok(result)
    }
}

/// State before the first output: up trend anchored at the first high.
pub fn initial_state(first: &Bar, acceleration_step: f64) -> PsarState {
    PsarState {
        trend: Trend::Up,
        acceleration_factor: acceleration_step,
        extreme_point: first.high,
        current_sar: first.high,
    }
}

/// Stop levels for `bars[1..]`.
pub fn compute(
    bars: &[Bar],
    acceleration_step: f64,
    max_acceleration: f64,
) -> Result<Vec<f64>, AnalysisError> {
    ParabolicSar::new(acceleration_step, max_acceleration)?.stops(bars)
}

fn validate(step: f64, max: f64) -> Result<(), AnalysisError> {
    if !(step > 0.0) || !step.is_finite() {
        return Err(AnalysisError::invalid(format!(
            "acceleration step must be a positive number, got {step}"
        )));
    }
    if !(max >= step) || !max.is_finite() {
        return Err(AnalysisError::invalid(format!(
            "max acceleration ({max}) must be >= acceleration step ({step})"
        )));
    }
    Ok(())
}
