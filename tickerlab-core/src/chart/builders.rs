//! One chart per statistic.
//!
//! Builders are pure: they compute whatever indicator they show from the
//! series and the given parameters, and return a `ChartSpec`.

use super::{Axis, ChartSpec, Trace};
use crate::data::LookbackPeriod;
use crate::domain::BarSeries;
use crate::error::AnalysisError;
use crate::indicators::rsi::RsiBands;
use crate::indicators::{
    moving_averages, Bollinger, Indicator, Macd, MovingAverageKind, ParabolicSar, Rsi,
};
use crate::profit_loss::ProfitLoss;

fn label(series: &BarSeries) -> String {
    series.symbol().to_uppercase()
}

pub fn adj_close_chart(series: &BarSeries) -> ChartSpec {
    let symbol = label(series);
    ChartSpec::new(format!("{symbol} Stock Price"), format!("Adj Close {symbol}")).trace(
        Trace::line("Closing Price", &series.dates(), &series.adj_closes()),
    )
}

pub fn candlestick_chart(series: &BarSeries) -> ChartSpec {
    ChartSpec::new(label(series), "Price").trace(Trace::candlestick(label(series), series.bars()))
}

/// Adjusted close as a plain line, titled with the lookback it covers.
pub fn line_chart(series: &BarSeries, period: LookbackPeriod) -> ChartSpec {
    let title = format!("{} Stock Price with {period}-Day", label(series));
    ChartSpec::new(title, "Price").trace(Trace::line(
        "Closing Price",
        &series.dates(),
        &series.adj_closes(),
    ))
}

pub fn volume_chart(series: &BarSeries, period: LookbackPeriod) -> ChartSpec {
    let volumes: Vec<f64> = series.volumes().into_iter().map(|v| v as f64).collect();
    let title = format!("{} Stock Volume with {period}-Day", label(series));
    ChartSpec::new(title, "Volume").trace(Trace::bar(
        "Volume",
        &series.dates(),
        &volumes,
    ))
}

/// Adjusted close overlaid with one moving average per window.
pub fn moving_average_chart(
    series: &BarSeries,
    kind: MovingAverageKind,
    windows: &[usize],
) -> Result<ChartSpec, AnalysisError> {
    let dates = series.dates();
    let kind_label = match kind {
        MovingAverageKind::Simple => "Simple",
        MovingAverageKind::Exponential => "Exponential",
    };
    let window_list = windows
        .iter()
        .map(|w| w.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let mut spec = ChartSpec::new(
        format!(
            "{} Stock Price with {window_list}-Day {kind_label} Moving Average",
            label(series)
        ),
        "Price",
    )
    .trace(Trace::line("Closing Price", &dates, &series.adj_closes()));

    for (name, values) in moving_averages(series.bars(), kind, windows)? {
        spec = spec.trace(Trace::line(name, &dates, &values));
    }
    Ok(spec)
}

/// MACD line, signal line, and histogram bars.
pub fn macd_chart(series: &BarSeries, macd: &Macd) -> ChartSpec {
    let dates = series.dates();
    let lines = macd.lines(series.bars());
    ChartSpec::new("MACD", "MACD")
        .trace(Trace::line("MACD", &dates, &lines.macd))
        .trace(Trace::line("Signal", &dates, &lines.signal))
        .trace(Trace::bar("MACD Histogram", &dates, &lines.histogram))
}

/// Parabolic SAR stops against the close. The first bar has no stop.
pub fn psar_chart(series: &BarSeries, psar: &ParabolicSar) -> Result<ChartSpec, AnalysisError> {
    let dates = series.dates();
    let stops = psar.compute(series.bars())?;
    Ok(ChartSpec::new("PSAR and Close Price", "Price")
        .trace(Trace::line("PSAR", &dates, &stops))
        .trace(Trace::line("Close Price", &dates, &series.closes())))
}

pub fn bollinger_chart(series: &BarSeries, bollinger: &Bollinger) -> ChartSpec {
    let dates = series.dates();
    let bands = bollinger.bands(series.bars());
    ChartSpec::new("Bollinger Bands of a Stock", "Price")
        .trace(Trace::line("Close Price", &dates, &series.closes()))
        .trace(Trace::line("Upper Bollinger Band", &dates, &bands.upper))
        .trace(Trace::line("Lower Bollinger Band", &dates, &bands.lower))
}

/// Close on the primary axis, RSI and its guide bands on the secondary axis.
pub fn rsi_chart(
    series: &BarSeries,
    rsi: &Rsi,
    bands: RsiBands,
) -> Result<ChartSpec, AnalysisError> {
    let dates = series.dates();
    let values = rsi.compute(series.bars())?;
    Ok(ChartSpec::new("RSI Chart", "Price")
        .with_y2_title("RSI")
        .trace(Trace::line("Close Price", &dates, &series.closes()))
        .trace(Trace::line("RSI", &dates, &values).on_secondary())
        .guide("Overbought", bands.upper, Axis::Secondary)
        .guide("Oversold", bands.lower, Axis::Secondary))
}

/// Position value over time with a breakeven line at the invested amount.
pub fn profit_loss_chart(pl: &ProfitLoss) -> ChartSpec {
    ChartSpec::new("Accumulated Profit/Loss Over Time", "Accumulated Profit/Loss")
        .trace(Trace::from_series(&pl.walk))
        .guide("Breakeven", pl.summary.invested, Axis::Primary)
}
