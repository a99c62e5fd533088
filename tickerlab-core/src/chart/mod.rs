//! Chart descriptions and artifact export.
//!
//! A `ChartSpec` is a renderer-agnostic description of one figure: titled
//! axes, a list of traces, and horizontal guide lines. Builders in
//! [`builders`] produce one spec per statistic; [`export`] writes specs as
//! JSON (for a renderer) or CSV (the raw series keyed by date).
//!
//! Undefined values (`NaN`) serialize as JSON `null` and as empty CSV cells.

pub mod builders;
pub mod export;

pub use builders::*;
pub use export::{to_csv, to_json, write_chart_csv, write_chart_json};

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::domain::{Bar, NamedSeries};

/// Bumped whenever the JSON layout changes.
pub const CHART_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    Line,
    Bar,
    Candlestick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    #[default]
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ohlc {
    #[serde(serialize_with = "finite_or_null")]
    pub open: f64,
    #[serde(serialize_with = "finite_or_null")]
    pub high: f64,
    #[serde(serialize_with = "finite_or_null")]
    pub low: f64,
    #[serde(serialize_with = "finite_or_null")]
    pub close: f64,
}

/// One x/y sample. Candlestick points also carry their OHLC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    #[serde(serialize_with = "finite_or_null")]
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ohlc: Option<Ohlc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub name: String,
    pub kind: TraceKind,
    pub axis: Axis,
    pub points: Vec<ChartPoint>,
}

impl Trace {
    /// Trace over `dates` and `values`, which must be the same length.
    pub fn from_values(
        name: impl Into<String>,
        kind: TraceKind,
        dates: &[NaiveDate],
        values: &[f64],
    ) -> Self {
        debug_assert_eq!(dates.len(), values.len());
        Self {
            name: name.into(),
            kind,
            axis: Axis::Primary,
            points: dates
                .iter()
                .zip(values)
                .map(|(&date, &value)| ChartPoint {
                    date,
                    value,
                    ohlc: None,
                })
                .collect(),
        }
    }

    pub fn line(name: impl Into<String>, dates: &[NaiveDate], values: &[f64]) -> Self {
        Self::from_values(name, TraceKind::Line, dates, values)
    }

    pub fn bar(name: impl Into<String>, dates: &[NaiveDate], values: &[f64]) -> Self {
        Self::from_values(name, TraceKind::Bar, dates, values)
    }

    pub fn from_series(series: &NamedSeries) -> Self {
        Self {
            name: series.name.clone(),
            kind: TraceKind::Line,
            axis: Axis::Primary,
            points: series
                .points
                .iter()
                .map(|p| ChartPoint {
                    date: p.date,
                    value: p.value,
                    ohlc: None,
                })
                .collect(),
        }
    }

    pub fn candlestick(name: impl Into<String>, bars: &[Bar]) -> Self {
        Self {
            name: name.into(),
            kind: TraceKind::Candlestick,
            axis: Axis::Primary,
            points: bars
                .iter()
                .map(|b| ChartPoint {
                    date: b.date,
                    value: b.close,
                    ohlc: Some(Ohlc {
                        open: b.open,
                        high: b.high,
                        low: b.low,
                        close: b.close,
                    }),
                })
                .collect(),
        }
    }

    pub fn on_secondary(mut self) -> Self {
        self.axis = Axis::Secondary;
        self
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}

/// Horizontal reference line spanning the whole x range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Guide {
    pub label: String,
    pub value: f64,
    pub axis: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub schema_version: u32,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y2_title: Option<String>,
    pub traces: Vec<Trace>,
    pub guides: Vec<Guide>,
}

impl ChartSpec {
    /// Empty chart with a date x-axis.
    pub fn new(title: impl Into<String>, y_title: impl Into<String>) -> Self {
        Self {
            schema_version: CHART_SCHEMA_VERSION,
            title: title.into(),
            x_title: "Date".to_string(),
            y_title: y_title.into(),
            y2_title: None,
            traces: Vec::new(),
            guides: Vec::new(),
        }
    }

    pub fn with_y2_title(mut self, title: impl Into<String>) -> Self {
        self.y2_title = Some(title.into());
        self
    }

    pub fn trace(mut self, trace: Trace) -> Self {
        self.traces.push(trace);
        self
    }

    pub fn guide(mut self, label: impl Into<String>, value: f64, axis: Axis) -> Self {
        self.guides.push(Guide {
            label: label.into(),
            value,
            axis,
        });
        self
    }

    pub fn find_trace(&self, name: &str) -> Option<&Trace> {
        self.traces.iter().find(|t| t.name == name)
    }
}

fn finite_or_null<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_none()
    }
}
