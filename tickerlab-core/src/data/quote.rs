//! Best-effort quote metadata ("fundamentals").
//!
//! Quote metadata is decorative: any failure is logged and yields an empty
//! `Fundamentals` rather than an error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, warn};

use super::yahoo::USER_AGENT;

/// Free-form quote fields as returned by the provider (market cap, P/E, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fundamentals(Map<String, Value>);

impl Fundamentals {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Numeric field, if present and numeric.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Source of quote metadata.
pub trait QuoteProvider: Send + Sync {
    /// Never fails; returns empty fundamentals when nothing can be fetched.
    fn fundamentals(&self, symbol: &str) -> Fundamentals;
}

/// Reads the `quote` object of Yahoo's options endpoint.
pub struct YahooQuoteProvider {
    client: Option<reqwest::blocking::Client>,
    base_url: String,
}

impl YahooQuoteProvider {
    pub fn new() -> Self {
        Self::with_base_url("https://query2.finance.yahoo.com/v7/finance/options")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| warn!(error = %e, "quote client unavailable"))
            .ok();
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn try_fetch(&self, symbol: &str) -> Result<Fundamentals, String> {
        let client = self.client.as_ref().ok_or("no HTTP client")?;
        let url = format!("{}/{symbol}", self.base_url);
        debug!(symbol, %url, "requesting quote metadata");

        let resp = client.get(&url).send().map_err(|e| e.to_string())?;
        let status = resp.status();
        if !status.is_success() {
            return Err(format!("HTTP {status}"));
        }
        let body: Value = resp.json().map_err(|e| e.to_string())?;
        extract_quote(&body).ok_or_else(|| "response has no optionChain quote".to_string())
    }
}

impl Default for YahooQuoteProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteProvider for YahooQuoteProvider {
    fn fundamentals(&self, symbol: &str) -> Fundamentals {
        match self.try_fetch(symbol) {
            Ok(f) => f,
            Err(reason) => {
                warn!(symbol, %reason, "error fetching fundamental data");
                Fundamentals::empty()
            }
        }
    }
}

/// Pull `optionChain.result[0].quote` out of an options response.
fn extract_quote(body: &Value) -> Option<Fundamentals> {
    body.pointer("/optionChain/result/0/quote")?
        .as_object()
        .cloned()
        .map(Fundamentals::new)
}
