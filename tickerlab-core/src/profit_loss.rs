//! Buy-and-hold profit/loss walk.
//!
//! Buys as many whole shares as `investment` affords at the first close and
//! holds them to the last bar. The walk values the position at every close;
//! the summary compares the final value with the amount actually invested.

use serde::Serialize;

use crate::domain::{BarSeries, NamedSeries};
use crate::error::AnalysisError;

/// Closing figures of the walk, all percentages in percent units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfitLossSummary {
    pub shares: u64,
    pub invested: f64,
    pub current_value: f64,
    pub profit_loss: f64,
    /// Profit relative to the current value.
    pub percent_gain_loss: f64,
    /// Profit relative to the amount invested.
    pub percentage_returns: f64,
    /// Price change from first to last close.
    pub net_gains_or_losses: f64,
    pub total_return: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitLoss {
    /// Position value at each close, starting at the invested amount.
    pub walk: NamedSeries,
    pub summary: ProfitLossSummary,
}

/// Simulate holding `floor(investment / first close)` shares over `series`.
pub fn simulate(series: &BarSeries, investment: f64) -> Result<ProfitLoss, AnalysisError> {
    let (first, last) = match (series.first(), series.last()) {
        (Some(f), Some(l)) => (f.close, l.close),
        _ => return Err(AnalysisError::invalid("profit/loss needs at least one bar")),
    };
    if !(investment > 0.0) || !investment.is_finite() {
        return Err(AnalysisError::invalid(format!(
            "investment must be a positive amount, got {investment}"
        )));
    }
    if !(first > 0.0) {
        return Err(AnalysisError::invalid(format!(
            "first close must be positive, got {first}"
        )));
    }

    let shares = (investment / first).floor();
    if shares < 1.0 {
        return Err(AnalysisError::invalid(format!(
            "investment {investment} buys no shares at {first}"
        )));
    }

    let invested = first * shares;
    let current_value = last * shares;
    let profit_loss = current_value - invested;

    let mut values = Vec::with_capacity(series.len());
    values.push(invested);
    values.extend(series.bars().iter().skip(1).map(|b| b.close * shares));

    Ok(ProfitLoss {
        walk: NamedSeries::from_parts("Profit/Loss", &series.dates(), &values),
        summary: ProfitLossSummary {
            shares: shares as u64,
            invested,
            current_value,
            profit_loss,
            percent_gain_loss: profit_loss / current_value * 100.0,
            percentage_returns: profit_loss / invested * 100.0,
            net_gains_or_losses: (last - first) / first * 100.0,
            total_return: (current_value / invested - 1.0) * 100.0,
        },
    })
}
