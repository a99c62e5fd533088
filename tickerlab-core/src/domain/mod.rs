//! Domain types: bars, series, and the analysis subject.

pub mod bar;
pub mod series;
pub mod ticker;

pub use bar::Bar;
pub use series::{BarSeries, DatedValue, NamedSeries};
pub use ticker::Ticker;
