//! GexBot API client
//!
//! Fetches classic GEX snapshots: `{base_url}/{ticker}/classic/{aggregation}?key=...`
//! No retries; a failed fetch fails that ticker only.

use std::time::Duration;

use serde_json::Value;

use crate::core::{GexError, GexResult, GexSnapshot};

pub const DEFAULT_BASE_URL: &str = "https://api.gexbot.com";

/// GexBot API client
pub struct GexBotClient {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl GexBotClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> GexResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("GexLevels/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| GexError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Client against the public endpoint with a 15 s timeout
    pub fn with_key(api_key: impl Into<String>) -> GexResult<Self> {
        Self::new(api_key, DEFAULT_BASE_URL, Duration::from_secs(15))
    }

    /// Endpoint URL without the key
    pub fn endpoint(&self, ticker: &str, aggregation: &str) -> String {
        format!("{}/{}/classic/{}", self.base_url, ticker, aggregation)
    }

    /// Fetch the raw JSON payload
    pub fn fetch_raw(&self, ticker: &str, aggregation: &str) -> GexResult<Value> {
        let url = self.endpoint(ticker, aggregation);

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(|e| GexError::network(format!("{}/{}: {}", ticker, aggregation, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GexError::network(format!(
                "{}/{}: HTTP {} {}",
                ticker,
                aggregation,
                status,
                body.trim()
            )));
        }

        response
            .json()
            .map_err(|e| {
                GexError::data(format!("Failed to parse {}/{} payload: {}", ticker, aggregation, e))
            })
    }

    /// Fetch and parse a snapshot
    pub fn fetch_snapshot(&self, ticker: &str, aggregation: &str) -> GexResult<GexSnapshot> {
        let payload = self.fetch_raw(ticker, aggregation)?;
        let snapshot = GexSnapshot::from_value(&payload)?;

        tracing::info!(
            "Fetched {}/{} - {} strikes",
            ticker,
            aggregation,
            snapshot.strikes.len()
        );

        Ok(snapshot)
    }
}
