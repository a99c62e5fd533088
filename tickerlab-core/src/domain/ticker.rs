//! Ticker, the analysis subject: a symbol, its bar history, and quote metadata.
//!
//! A `Ticker` only bundles data. Every statistic is a pure function over the
//! `BarSeries`; nothing is computed or cached here.

use std::fmt;

use super::series::{BarSeries, NamedSeries};
use crate::data::{DataError, DataProvider, Fundamentals, LookbackPeriod, QuoteProvider};

#[derive(Debug, Clone)]
pub struct Ticker {
    symbol: String,
    period: LookbackPeriod,
    series: BarSeries,
    fundamentals: Fundamentals,
}

impl Ticker {
    /// Wrap an already-loaded series.
    pub fn new(series: BarSeries, period: LookbackPeriod) -> Self {
        Self {
            symbol: series.symbol().to_string(),
            period,
            series,
            fundamentals: Fundamentals::empty(),
        }
    }

    /// Fetch bars from `provider` and, when given, quote metadata from `quotes`.
    ///
    /// A bar fetch failure is an error; a quote failure only leaves the
    /// fundamentals empty.
    pub fn load(
        symbol: &str,
        period: LookbackPeriod,
        provider: &dyn DataProvider,
        quotes: Option<&dyn QuoteProvider>,
    ) -> Result<Self, DataError> {
        let series = provider.fetch(symbol, period)?;
        if series.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        let fundamentals = quotes
            .map(|q| q.fundamentals(symbol))
            .unwrap_or_default();
        Ok(Self {
            symbol: symbol.to_string(),
            period,
            series,
            fundamentals,
        })
    }

    pub fn with_fundamentals(mut self, fundamentals: Fundamentals) -> Self {
        self.fundamentals = fundamentals;
        self
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn period(&self) -> LookbackPeriod {
        self.period
    }

    pub fn series(&self) -> &BarSeries {
        &self.series
    }

    pub fn fundamentals(&self) -> &Fundamentals {
        &self.fundamentals
    }

    /// Adjusted close, labelled with the ticker symbol.
    pub fn adj_close(&self) -> NamedSeries {
        NamedSeries::from_parts(
            self.symbol.clone(),
            &self.series.dates(),
            &self.series.adj_closes(),
        )
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.symbol.to_uppercase();
        match self.series.date_range() {
            Some((start, end)) => write!(f, "{symbol} [{start} - {end}]"),
            None => write!(f, "{symbol} [no data]"),
        }
    }
}
