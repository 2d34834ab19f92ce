//! Listing records and query parameters for the listings endpoint

use crate::error::ReportError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Currency code every report query converts into
pub const USD: &str = "USD";

/// One cryptocurrency's market snapshot as returned by the listings endpoint
///
/// Fields the reports don't read (id, name, cmc_rank, supply figures, ...)
/// are kept in `extra` so a persisted report carries the full listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRecord {
    pub symbol: String,
    pub quote: BTreeMap<String, Quote>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Price figures for a listing in one target currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub price: f64,
    pub volume_24h: f64,
    pub percent_change_24h: f64,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CurrencyRecord {
    /// Build a record with a single quote and no extra fields
    pub fn new(symbol: impl Into<String>, currency: &str, quote: Quote) -> Self {
        let mut quotes = BTreeMap::new();
        quotes.insert(currency.to_string(), quote);
        Self {
            symbol: symbol.into(),
            quote: quotes,
            extra: Map::new(),
        }
    }

    /// Quote in `currency`, or `MalformedResponse` if the API omitted it
    pub fn quote_in(&self, currency: &str) -> Result<&Quote, ReportError> {
        self.quote.get(currency).ok_or_else(|| {
            ReportError::MalformedResponse(format!(
                "listing {} has no {} quote",
                self.symbol, currency
            ))
        })
    }
}

impl Quote {
    pub fn new(price: f64, volume_24h: f64, percent_change_24h: f64, market_cap: Option<f64>) -> Self {
        Self {
            price,
            volume_24h,
            percent_change_24h,
            market_cap,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    MarketCap,
    Volume24h,
    PercentChange24h,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::MarketCap => "market_cap",
            SortField::Volume24h => "volume_24h",
            SortField::PercentChange24h => "percent_change_24h",
        }
    }

    /// Value of this field in `quote`; a missing market cap sorts as absent
    pub fn value_of(&self, quote: &Quote) -> Option<f64> {
        match self {
            SortField::MarketCap => quote.market_cap,
            SortField::Volume24h => Some(quote.volume_24h),
            SortField::PercentChange24h => Some(quote.percent_change_24h),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

/// Query parameters for one listings request
///
/// Only shapes what the fetcher returns; the aggregations keep no state of
/// their own.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingsQuery {
    /// 1-based offset into the ranked listing
    pub start: usize,
    pub limit: Option<usize>,
    pub volume_24h_min: Option<f64>,
    pub sort: Option<SortField>,
    pub sort_dir: Option<SortDirection>,
    pub convert: String,
}

impl Default for ListingsQuery {
    fn default() -> Self {
        Self {
            start: 1,
            limit: None,
            volume_24h_min: None,
            sort: None,
            sort_dir: None,
            convert: USD.to_string(),
        }
    }
}

impl ListingsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn sorted_by(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort = Some(field);
        self.sort_dir = Some(direction);
        self
    }

    pub fn min_volume(mut self, volume_24h_min: f64) -> Self {
        self.volume_24h_min = Some(volume_24h_min);
        self
    }

    pub fn start_at(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    /// URL query pairs in the API's parameter names; unset options are omitted
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("start", self.start.to_string())];

        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(min) = self.volume_24h_min {
            pairs.push(("volume_24h_min", min.to_string()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.as_str().to_string()));
        }
        if let Some(dir) = self.sort_dir {
            pairs.push(("sort_dir", dir.as_str().to_string()));
        }
        pairs.push(("convert", self.convert.clone()));

        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_pairs_top_by_volume() {
        let query = ListingsQuery::new()
            .limit(1)
            .sorted_by(SortField::Volume24h, SortDirection::Descending);

        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("start", "1".to_string()),
                ("limit", "1".to_string()),
                ("sort", "volume_24h".to_string()),
                ("sort_dir", "desc".to_string()),
                ("convert", "USD".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_volume_floor_has_no_limit() {
        let query = ListingsQuery::new().min_volume(76_000_000.0);

        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("start", "1".to_string()),
                ("volume_24h_min", "76000000".to_string()),
                ("convert", "USD".to_string()),
            ]
        );
    }

    #[test]
    fn test_record_keeps_unread_fields() {
        let raw = json!({
            "id": 1,
            "name": "Bitcoin",
            "symbol": "BTC",
            "cmc_rank": 1,
            "quote": {
                "USD": {
                    "price": 67000.5,
                    "volume_24h": 31000000000.0,
                    "percent_change_24h": 1.25,
                    "market_cap": 1320000000000.0,
                    "percent_change_7d": -3.1
                }
            }
        });

        let record: CurrencyRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(record.symbol, "BTC");
        assert_eq!(record.extra.get("name"), Some(&json!("Bitcoin")));

        let usd = record.quote_in(USD).unwrap();
        assert_eq!(usd.price, 67000.5);
        assert_eq!(usd.market_cap, Some(1320000000000.0));
        assert_eq!(usd.extra.get("percent_change_7d"), Some(&json!(-3.1)));

        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }

    #[test]
    fn test_null_market_cap_is_accepted() {
        let raw = json!({
            "symbol": "NEW",
            "quote": { "USD": { "price": 0.5, "volume_24h": 10.0, "percent_change_24h": 0.0, "market_cap": null } }
        });
        let record: CurrencyRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.quote_in(USD).unwrap().market_cap, None);
    }

    #[test]
    fn test_missing_price_is_rejected() {
        let raw = json!({
            "symbol": "BAD",
            "quote": { "USD": { "volume_24h": 10.0, "percent_change_24h": 0.0 } }
        });
        assert!(serde_json::from_value::<CurrencyRecord>(raw).is_err());
    }

    #[test]
    fn test_missing_currency_quote() {
        let record = CurrencyRecord::new("ETH", "EUR", Quote::new(3000.0, 1.0, 0.0, None));
        let err = record.quote_in(USD).unwrap_err();
        assert!(matches!(err, ReportError::MalformedResponse(_)));
    }
}
