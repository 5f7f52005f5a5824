//! HTTP client for the stock quote provider.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

use crate::models::Quote;

use super::types::QuoteResponse;

const QUOTE_API_BASE: &str = "https://cloud.iexapis.com/stable";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can resolve a ticker symbol to a quote.
///
/// The web handlers only see this trait, so tests can swap in a canned
/// source instead of the live provider.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Look up a symbol. `Ok(None)` means the provider does not know it.
    async fn lookup(&self, symbol: &str) -> Result<Option<Quote>>;
}

/// Client for the quote provider (read-only).
pub struct QuoteClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl QuoteClient {
    /// Create a new quote client against the default provider.
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(QUOTE_API_BASE.to_string(), api_key)
    }

    /// Create with custom base URL (for testing).
    pub fn with_base_url(base_url: String, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }
}

#[async_trait]
impl QuoteSource for QuoteClient {
    async fn lookup(&self, symbol: &str) -> Result<Option<Quote>> {
        let url = format!(
            "{}/stock/{}/quote?token={}",
            self.base_url,
            symbol.trim().to_lowercase(),
            self.api_key
        );

        debug!(symbol = %symbol, "Fetching quote");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to fetch quote")?;

        // The provider answers 404 for symbols it has never heard of.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Quote request failed: {} - {}", status, body);
        }

        let quote: QuoteResponse = response
            .json()
            .await
            .context("Failed to parse quote response")?;

        Ok(Some(quote.into()))
    }
}
