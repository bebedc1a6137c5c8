//! Third-party random quote API (API Ninjas).

use reqwest::{Client, StatusCode};

use crate::models::ExternalQuote;
use crate::util::is_http_url;
use crate::{Error, Result};

/// Default API Ninjas base URL
pub const DEFAULT_QUOTES_API_URL: &str = "https://api.api-ninjas.com/v2";

/// HTTP client for `GET {base}/quotes`.
#[derive(Clone)]
pub struct QuotesApiClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl std::fmt::Debug for QuotesApiClient {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("QuotesApiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl QuotesApiClient {
    pub fn new(base_url: impl AsRef<str>, api_key: impl Into<String>) -> Result<Self> {
        let base_url = base_url.as_ref().trim().trim_end_matches('/').to_string();
        if !is_http_url(&base_url) {
            return Err(Error::InvalidInput(
                "Quote API URL must include http:// or https://".to_string(),
            ));
        }
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(Error::InvalidInput(
                "Quote API key must not be empty".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            api_key,
            client: Client::builder().build()?,
        })
    }

    /// Returns the base URL this client was configured with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one random quote, optionally restricted to a category.
    pub async fn random_quote(&self, category: Option<&str>) -> Result<ExternalQuote> {
        let mut url = format!("{}/quotes", self.base_url);
        if let Some(category) = category.map(str::trim).filter(|value| !value.is_empty()) {
            url.push_str("?category=");
            url.push_str(&urlencoding::encode(category));
        }

        let response = self
            .client
            .get(url)
            .header("X-Api-Key", &self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;
        if response.status() != StatusCode::OK {
            tracing::warn!(status = %response.status(), "Quote API request failed");
            return Err(Error::Server("Failed to fetch quote".to_string()));
        }

        let body = response.text().await?;
        let quotes: Vec<ExternalQuote> = serde_json::from_str(&body)?;
        quotes
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound("quote API returned no quotes".to_string()))
    }
}
