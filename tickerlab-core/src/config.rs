//! Analysis configuration.
//!
//! One immutable record holds every default the analyses use. Missing TOML
//! keys fall back to the defaults below; values are validated on load.
//!
//! ```toml
//! period = "5Y"
//! benchmark_index = "^GSPC"
//! risk_free_rate = 0.05
//!
//! [psar]
//! acceleration_step = 0.02
//! max_acceleration = 0.2
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::LookbackPeriod;
use crate::error::{AnalysisError, ConfigError};
use crate::indicators::rsi::RsiBands;
use crate::indicators::{Bollinger, Macd, MovingAverageKind, ParabolicSar, Rsi};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// History to load, e.g. "10Y", "6MO", "YTD".
    pub period: LookbackPeriod,
    /// Benchmark symbol for beta and alpha.
    pub benchmark_index: String,
    /// Annual risk-free rate as a fraction (0.05 = 5%).
    pub risk_free_rate: f64,
    /// Cash put into the profit/loss simulation.
    pub investment: f64,
    pub moving_average: MovingAverageConfig,
    pub psar: PsarConfig,
    pub macd: MacdConfig,
    pub rsi: RsiConfig,
    pub bollinger: BollingerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovingAverageConfig {
    pub kind: MovingAverageKind,
    pub periods: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsarConfig {
    pub acceleration_step: f64,
    pub max_acceleration: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdConfig {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiConfig {
    pub window: usize,
    pub upper_band: f64,
    pub lower_band: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerConfig {
    pub period: usize,
    pub multiplier: f64,
}

pub const DEFAULT_MOVING_AVERAGE_PERIOD: usize = 20;

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            period: LookbackPeriod::default(),
            benchmark_index: "^GSPC".to_string(),
            risk_free_rate: 0.05,
            investment: 5000.0,
            moving_average: MovingAverageConfig::default(),
            psar: PsarConfig::default(),
            macd: MacdConfig::default(),
            rsi: RsiConfig::default(),
            bollinger: BollingerConfig::default(),
        }
    }
}

impl Default for MovingAverageConfig {
    fn default() -> Self {
        Self {
            kind: MovingAverageKind::Simple,
            periods: vec![DEFAULT_MOVING_AVERAGE_PERIOD],
        }
    }
}

impl Default for PsarConfig {
    fn default() -> Self {
        Self {
            acceleration_step: 0.02,
            max_acceleration: 0.2,
        }
    }
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self {
            window: 14,
            upper_band: 70.0,
            lower_band: 30.0,
        }
    }
}

impl Default for BollingerConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_MOVING_AVERAGE_PERIOD,
            multiplier: 2.0,
        }
    }
}

impl AnalysisConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid {
            field: "config",
            reason: e.to_string(),
        })
    }

    /// Content hash of the configuration, stable across runs.
    pub fn fingerprint(&self) -> Result<String, ConfigError> {
        let json = serde_json::to_vec(self).map_err(|e| ConfigError::Invalid {
            field: "config",
            reason: e.to_string(),
        })?;
        Ok(blake3::hash(&json).to_hex().to_string())
    }

    /// Check every parameter by building the objects that use it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.benchmark_index.trim().is_empty() {
            return Err(invalid("benchmark_index", "must not be empty"));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(invalid("risk_free_rate", "must be a finite number"));
        }
        if !(self.investment > 0.0) || !self.investment.is_finite() {
            return Err(invalid("investment", "must be a positive amount"));
        }
        if self.moving_average.periods.is_empty() {
            return Err(invalid("moving_average.periods", "needs at least one period"));
        }
        for &p in &self.moving_average.periods {
            self.moving_average
                .kind
                .indicator(p)
                .map_err(|e| invalid("moving_average.periods", e))?;
        }
        self.psar.indicator().map_err(|e| invalid("psar", e))?;
        self.macd.indicator().map_err(|e| invalid("macd", e))?;
        self.rsi.indicator().map_err(|e| invalid("rsi.window", e))?;
        self.rsi.bands().map_err(|e| invalid("rsi", e))?;
        self.bollinger.middle().map_err(|e| invalid("bollinger", e))?;
        Ok(())
    }
}

impl PsarConfig {
    pub fn indicator(&self) -> Result<ParabolicSar, AnalysisError> {
        ParabolicSar::new(self.acceleration_step, self.max_acceleration)
    }
}

impl MacdConfig {
    pub fn indicator(&self) -> Result<Macd, AnalysisError> {
        Macd::new(self.fast, self.slow, self.signal)
    }
}

impl RsiConfig {
    pub fn indicator(&self) -> Result<Rsi, AnalysisError> {
        Rsi::new(self.window)
    }

    pub fn bands(&self) -> Result<RsiBands, AnalysisError> {
        RsiBands::new(self.upper_band, self.lower_band)
    }
}

impl BollingerConfig {
    pub fn middle(&self) -> Result<Bollinger, AnalysisError> {
        Bollinger::middle(self.period, self.multiplier)
    }
}

fn invalid(field: &'static str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
