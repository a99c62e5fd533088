//! Bar providers and quote metadata.

pub mod csv_import;
pub mod period;
pub mod provider;
pub mod quote;
pub mod synthetic;
pub mod yahoo;

pub use csv_import::CsvProvider;
pub use period::LookbackPeriod;
pub use provider::{DataError, DataProvider, DataSource};
pub use quote::{Fundamentals, QuoteProvider, YahooQuoteProvider};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
