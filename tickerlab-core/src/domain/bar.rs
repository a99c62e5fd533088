//! Bar: one trading day of market data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV record with the provider's adjusted close.
///
/// Bars are not validated on construction. A bar whose prices violate
/// `low <= {open, close, adj_close} <= high` still flows through every
/// computation and simply yields meaningless numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: u64,
}

impl Bar {
    /// Returns true if any price field is NaN.
    pub fn is_void(&self) -> bool {
        self.open.is_nan()
            || self.high.is_nan()
            || self.low.is_nan()
            || self.close.is_nan()
            || self.adj_close.is_nan()
    }

    /// Checks the well-formedness invariant: low <= open/close/adj_close <= high,
    /// and no negative prices.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        let within = |p: f64| self.low <= p && p <= self.high;
        self.low >= 0.0 && within(self.open) && within(self.close) && within(self.adj_close)
    }
}
