//! Derived columns attached to a bar series.
//!
//! The bars themselves are never touched: each indicator adds a named column
//! of the same length, in attachment order.

use chrono::NaiveDate;

use super::Indicator;
use crate::domain::BarSeries;
use crate::error::AnalysisError;

#[derive(Debug, Clone, Default)]
pub struct IndicatorFrame {
    dates: Vec<NaiveDate>,
    columns: Vec<(String, Vec<f64>)>,
}

impl IndicatorFrame {
    pub fn new(series: &BarSeries) -> Self {
        Self {
            dates: series.dates(),
            columns: Vec::new(),
        }
    }

    /// Compute `indicator` over `series` and append it as a column.
    ///
    /// Re-attaching a name replaces the earlier column in place.
    pub fn attach(
        &mut self,
        series: &BarSeries,
        indicator: &dyn Indicator,
    ) -> Result<&mut Self, AnalysisError> {
        let values = indicator.compute(series.bars())?;
        self.insert(indicator.name(), values)?;
        Ok(self)
    }

    /// Append a precomputed column.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), AnalysisError> {
        let name = name.into();
        if values.len() != self.dates.len() {
            return Err(AnalysisError::invalid(format!(
                "column '{name}' has {} values for {} bars",
                values.len(),
                self.dates.len()
            )));
        }
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = values,
            None => self.columns.push((name, values)),
        }
        Ok(())
    }

    /// Value of a column at a bar index.
    pub fn get(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.column(name).and_then(|v| v.get(bar_index).copied())
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Most recent non-NaN value of a column.
    pub fn latest(&self, name: &str) -> Option<f64> {
        self.column(name)?.iter().rev().copied().find(|v| !v.is_nan())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{make_bars, Rsi, Sma};

    fn series() -> BarSeries {
        BarSeries::new("TEST", make_bars(&[10.0, 11.0, 12.0, 11.0, 13.0])).unwrap()
    }

    #[test]
    fn attach_keeps_order_and_alignment() {
        let series = series();
        let mut frame = IndicatorFrame::new(&series);
        frame
            .attach(&series, &Sma::new(2).unwrap())
            .unwrap()
            .attach(&series, &Rsi::new(3).unwrap())
            .unwrap();

        assert_eq!(frame.names().collect::<Vec<_>>(), vec!["sma_2", "rsi_3"]);
        assert!(frame.get("sma_2", 0).unwrap().is_nan());
        assert_eq!(frame.get("sma_2", 1), Some(10.5));
        assert_eq!(frame.get("sma_2", 5), None);
        assert_eq!(frame.latest("sma_2"), Some(12.0));
        assert_eq!(frame.dates().len(), 5);
    }

    #[test]
    fn reattaching_replaces_column() {
        let series = series();
        let mut frame = IndicatorFrame::new(&series);
        frame.insert("x", vec![1.0; 5]).unwrap();
        frame.insert("x", vec![2.0; 5]).unwrap();
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.get("x", 0), Some(2.0));
    }

    #[test]
    fn misaligned_column_is_rejected() {
        let series = series();
        let mut frame = IndicatorFrame::new(&series);
        assert!(frame.insert("short", vec![1.0; 3]).is_err());
        assert!(frame.is_empty());
        assert_eq!(frame.get("missing", 0), None);
    }
}
