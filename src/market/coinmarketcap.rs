//! CoinMarketCap listings API integration
//!
//! ## API Reference
//!
//! Endpoint: `{base_url}/v1/cryptocurrency/listings/latest`
//! Headers: `Accepts`, `X-CMC_PRO_API_KEY`
//! Returns: `{ "status": {...}, "data": [listing, ...] }`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use coinreport::market::{CoinMarketCapClient, ListingsFetcher, ListingsQuery};
//!
//! # async fn demo() -> Result<(), coinreport::ReportError> {
//! let client = CoinMarketCapClient::new("https://pro-api.coinmarketcap.com", "API_KEY", "application/json", None)?;
//! let listings = client.fetch_listings(&ListingsQuery::new().limit(20)).await?;
//! println!("fetched {} listings", listings.len());
//! # Ok(())
//! # }
//! ```

use super::fetcher::ListingsFetcher;
use super::types::{CurrencyRecord, ListingsQuery};
use crate::error::ReportError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use std::time::Duration;

pub const LISTINGS_PATH: &str = "/v1/cryptocurrency/listings/latest";
// Header names go out lowercase; HTTP matches them case-insensitively
pub const API_KEY_HEADER: &str = "x-cmc_pro_api_key";
pub const ACCEPTS_HEADER: &str = "accepts";

/// Largest `limit` the listings endpoint accepts
pub const MAX_PAGE_SIZE: usize = 5_000;

#[derive(Debug, Deserialize)]
struct ListingsResponse {
    #[serde(default)]
    status: Option<ApiStatus>,
    data: Vec<CurrencyRecord>,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    error_code: i64,
    #[serde(default)]
    error_message: Option<String>,
}

/// Authenticated client for the listings endpoint
pub struct CoinMarketCapClient {
    listings_url: String,
    client: reqwest::Client,
    page_size: usize,
}

impl CoinMarketCapClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - API root, e.g. "https://pro-api.coinmarketcap.com"
    /// * `api_key` - Value for the `X-CMC_PRO_API_KEY` header
    /// * `accept_header` - Value for the `Accepts` header
    /// * `timeout` - Optional per-request timeout; `None` waits indefinitely
    pub fn new(
        base_url: &str,
        api_key: &str,
        accept_header: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, ReportError> {
        let base_url = base_url.trim().trim_end_matches('/');

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(ACCEPTS_HEADER),
            header_value(accept_header, ACCEPTS_HEADER)?,
        );
        let mut key = header_value(api_key, API_KEY_HEADER)?;
        key.set_sensitive(true);
        headers.insert(HeaderName::from_static(API_KEY_HEADER), key);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ReportError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        log::info!(
            "Created CoinMarketCapClient: url='{}{}', timeout={:?}",
            base_url,
            LISTINGS_PATH,
            timeout
        );

        Ok(Self {
            listings_url: format!("{}{}", base_url, LISTINGS_PATH),
            client,
            page_size: MAX_PAGE_SIZE,
        })
    }

    /// Override the page size used for unlimited queries
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// One GET against the listings endpoint
    async fn fetch_page(&self, query: &ListingsQuery) -> Result<Vec<CurrencyRecord>, ReportError> {
        let pairs = query.to_query_pairs();
        log::debug!("GET {} {:?}", self.listings_url, pairs);

        let response = self
            .client
            .get(&self.listings_url)
            .query(&pairs)
            .send()
            .await
            .map_err(|e| ReportError::Transport(format!("Listings request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ReportError::Transport(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(ReportError::Transport(format!(
                "Listings API returned status {}: {}",
                status, body
            )));
        }

        let parsed: ListingsResponse = serde_json::from_str(&body)
            .map_err(|e| ReportError::MalformedResponse(format!("Failed to parse listings: {}", e)))?;

        if let Some(api_status) = parsed.status {
            if api_status.error_code != 0 {
                return Err(ReportError::Transport(format!(
                    "Listings API error {}: {}",
                    api_status.error_code,
                    api_status.error_message.unwrap_or_default()
                )));
            }
        }

        Ok(parsed.data)
    }

    /// Walk pages of `page_size` from `query.start` until a short page arrives
    async fn fetch_all_pages(&self, query: &ListingsQuery) -> Result<Vec<CurrencyRecord>, ReportError> {
        let mut all = Vec::new();
        let mut start = query.start;

        loop {
            let page_query = ListingsQuery {
                start,
                limit: Some(self.page_size),
                ..query.clone()
            };
            let page = self.fetch_page(&page_query).await?;
            let count = page.len();
            all.extend(page);

            if count < self.page_size {
                break;
            }
            start += count;
            log::debug!("Fetched full page of {}, continuing at start={}", count, start);
        }

        Ok(all)
    }
}

fn header_value(value: &str, name: &str) -> Result<HeaderValue, ReportError> {
    HeaderValue::from_str(value)
        .map_err(|e| ReportError::Transport(format!("Invalid {} header value: {}", name, e)))
}

#[async_trait]
impl ListingsFetcher for CoinMarketCapClient {
    async fn fetch_listings(&self, query: &ListingsQuery) -> Result<Vec<CurrencyRecord>, ReportError> {
        let records = match query.limit {
            // The endpoint rejects limit=0; an empty ranking needs no request
            Some(0) => Vec::new(),
            Some(_) => self.fetch_page(query).await?,
            None => self.fetch_all_pages(query).await?,
        };

        log::debug!("Fetched {} listings from CoinMarketCap", records.len());
        Ok(records)
    }

    fn source_name(&self) -> &'static str {
        "CoinMarketCap"
    }
}
