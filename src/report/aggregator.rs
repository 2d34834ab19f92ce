//! Report derivation over fetched listings
//!
//! The listings endpoint answers one ranking per request, so every figure
//! issues its own query:
//!
//! ```text
//! highest_trading_volume          limit 1,  sort volume_24h desc
//! top_n_by_percent_change         limit n,  sort percent_change_24h asc|desc
//! sum_price_top_n_by_market_cap   limit n,  sort market_cap desc
//! sum_price_above_volume          volume_24h_min, no limit
//! percent_change_of_aggregate     limit n,  sort market_cap desc
//! ```
//!
//! Sibling queries may see different snapshots of a live market. Pair the
//! aggregator with a `SnapshotFetcher` when one consistent batch is needed.

use super::types::Report;
use crate::error::ReportError;
use crate::market::{CurrencyRecord, ListingsFetcher, ListingsQuery, SortDirection, SortField, USD};
use std::sync::Arc;

pub const HIGHEST_VOLUME_LIMIT: usize = 1;
pub const TOP_MOVERS_COUNT: usize = 10;
pub const TOP_MARKET_CAP_COUNT: usize = 20;
/// 24h volume floor in USD for the liquid-currency price sum
pub const HIGH_VOLUME_FLOOR: f64 = 76_000_000.0;

pub struct ReportAggregator {
    fetcher: Arc<dyn ListingsFetcher>,
}

impl ReportAggregator {
    pub fn new(fetcher: Arc<dyn ListingsFetcher>) -> Self {
        Self { fetcher }
    }

    async fn fetch(&self, query: ListingsQuery) -> Result<Vec<CurrencyRecord>, ReportError> {
        let records = self.fetcher.fetch_listings(&query).await?;
        log::debug!(
            "{} returned {} records for {:?}",
            self.fetcher.source_name(),
            records.len(),
            query.to_query_pairs()
        );
        Ok(records)
    }

    /// Currency with the largest 24h trading volume
    pub async fn highest_trading_volume(&self) -> Result<CurrencyRecord, ReportError> {
        let query = ListingsQuery::new()
            .limit(HIGHEST_VOLUME_LIMIT)
            .sorted_by(SortField::Volume24h, SortDirection::Descending);

        self.fetch(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ReportError::EmptyResult("no listing returned for highest 24h volume".to_string()))
    }

    /// `n` currencies ranked by 24h percent change, in the order the fetcher
    /// returned them
    pub async fn top_n_by_percent_change(
        &self,
        n: usize,
        direction: SortDirection,
    ) -> Result<Vec<CurrencyRecord>, ReportError> {
        let query = ListingsQuery::new()
            .limit(n)
            .sorted_by(SortField::PercentChange24h, direction);
        self.fetch(query).await
    }

    /// Sum of prices of the `n` largest currencies by market cap, 2 decimals
    pub async fn sum_price_top_n_by_market_cap(&self, n: usize) -> Result<f64, ReportError> {
        let query = ListingsQuery::new()
            .limit(n)
            .sorted_by(SortField::MarketCap, SortDirection::Descending);
        let records = self.fetch(query).await?;
        Ok(round2(sum_prices(&records, USD)?))
    }

    /// Sum of prices of every currency whose 24h volume is at least
    /// `min_volume`, 2 decimals
    pub async fn sum_price_above_volume(&self, min_volume: f64) -> Result<f64, ReportError> {
        let query = ListingsQuery::new().min_volume(min_volume);
        let records = self.fetch(query).await?;

        let mut liquid = Vec::with_capacity(records.len());
        for record in records {
            if record.quote_in(USD)?.volume_24h >= min_volume {
                liquid.push(record);
            }
        }
        Ok(round2(sum_prices(&liquid, USD)?))
    }

    /// Percent change over 24h of the summed price of the `n` largest
    /// currencies by market cap
    pub async fn percent_change_of_aggregate(&self, n: usize) -> Result<f64, ReportError> {
        let query = ListingsQuery::new()
            .limit(n)
            .sorted_by(SortField::MarketCap, SortDirection::Descending);
        let records = self.fetch(query).await?;
        aggregate_percent_change(&records, USD)
    }

    /// Run every figure in sequence and assemble the daily report
    pub async fn build_report(&self) -> Result<Report, ReportError> {
        let highest_traded = self.highest_trading_volume().await?;
        let top_10_by_increment = self
            .top_n_by_percent_change(TOP_MOVERS_COUNT, SortDirection::Descending)
            .await?;
        let top_10_by_decrement = self
            .top_n_by_percent_change(TOP_MOVERS_COUNT, SortDirection::Ascending)
            .await?;
        let total_price_top_20 = self.sum_price_top_n_by_market_cap(TOP_MARKET_CAP_COUNT).await?;
        let total_price_of_higher_volume_currencies =
            self.sum_price_above_volume(HIGH_VOLUME_FLOOR).await?;
        let percent_change_of_twenty_best =
            self.percent_change_of_aggregate(TOP_MARKET_CAP_COUNT).await?;

        let report = Report {
            highest_traded,
            top_10_by_increment,
            top_10_by_decrement,
            total_price_top_20,
            total_price_of_higher_volume_currencies,
            percent_change_of_twenty_best,
        };

        let shared = report.shared_movers();
        if !shared.is_empty() {
            log::warn!(
                "Best and worst movers share {} symbol(s): {:?} (expected only when fewer than {} currencies are listed)",
                shared.len(),
                shared,
                2 * TOP_MOVERS_COUNT
            );
        }

        Ok(report)
    }
}

/// Round half away from zero to 2 decimal places
pub fn round2(value: f64) -> f64 {
    // `+ 0.0` turns -0.0 into 0.0
    (value * 100.0).round() / 100.0 + 0.0
}

/// Sum of `price` over `records` in `currency`, unrounded
pub fn sum_prices(records: &[CurrencyRecord], currency: &str) -> Result<f64, ReportError> {
    let mut total = 0.0;
    for record in records {
        total += record.quote_in(currency)?.price;
    }
    Ok(total)
}

/// Percent change of the summed basket price, 2 decimals
///
/// Yesterday's price of each record is reconstructed as
/// `price / (1 + percent_change_24h / 100)`. This is not the mean of the
/// individual percent changes: larger prices weigh more.
pub fn aggregate_percent_change(records: &[CurrencyRecord], currency: &str) -> Result<f64, ReportError> {
    let mut yesterday_total = 0.0;
    let mut today_total = 0.0;

    for record in records {
        let quote = record.quote_in(currency)?;
        let factor = 1.0 + quote.percent_change_24h / 100.0;
        if factor == 0.0 {
            return Err(ReportError::Arithmetic(format!(
                "{} fell 100% in 24h, its previous price is undefined",
                record.symbol
            )));
        }
        yesterday_total += quote.price / factor;
        today_total += quote.price;
    }

    if yesterday_total == 0.0 {
        return Err(ReportError::Arithmetic(format!(
            "previous total price of {} listings is zero",
            records.len()
        )));
    }

    Ok(round2((today_total / yesterday_total - 1.0) * 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{Quote, SnapshotFetcher};

    fn record(symbol: &str, price: f64, pct: f64) -> CurrencyRecord {
        CurrencyRecord::new(symbol, USD, Quote::new(price, 1_000.0, pct, Some(price * 1_000.0)))
    }

    fn aggregator(records: Vec<CurrencyRecord>) -> ReportAggregator {
        ReportAggregator::new(Arc::new(SnapshotFetcher::new(records)))
    }

    #[test]
    fn test_round2_half_up() {
        assert_eq!(round2(40.0), 40.0);
        assert_eq!(round2(2.675001), 2.68);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-2.2222), -2.22);
        assert!(round2(-0.001).is_sign_positive());
    }

    #[test]
    fn test_aggregate_percent_change_two_records() {
        let records = vec![record("A", 100.0, 10.0), record("B", 50.0, -20.0)];
        assert_eq!(aggregate_percent_change(&records, USD).unwrap(), -2.22);
    }

    #[test]
    fn test_aggregate_is_not_mean_of_changes() {
        let records = vec![record("BIG", 1_000.0, 1.0), record("SMALL", 1.0, 50.0)];
        let basket = aggregate_percent_change(&records, USD).unwrap();
        assert_eq!(basket, 1.03);
        assert_ne!(basket, round2((1.0 + 50.0) / 2.0));
    }

    #[test]
    fn test_aggregate_invariant_under_price_scaling() {
        let base = vec![
            record("A", 100.0, 10.0),
            record("B", 50.0, -20.0),
            record("C", 3.5, 4.25),
        ];
        let expected = aggregate_percent_change(&base, USD).unwrap();

        for k in [0.25, 2.0, 1024.0] {
            let scaled: Vec<CurrencyRecord> = base
                .iter()
                .map(|r| {
                    let q = r.quote_in(USD).unwrap();
                    record(&r.symbol, q.price * k, q.percent_change_24h)
                })
                .collect();
            assert_eq!(aggregate_percent_change(&scaled, USD).unwrap(), expected, "k = {}", k);
        }
    }

    #[test]
    fn test_aggregate_total_collapse_is_arithmetic_error() {
        let records = vec![record("A", 100.0, 10.0), record("RUG", 0.0, -100.0)];
        let err = aggregate_percent_change(&records, USD).unwrap_err();
        assert!(matches!(err, ReportError::Arithmetic(_)));
    }

    #[test]
    fn test_aggregate_empty_batch_is_arithmetic_error() {
        let err = aggregate_percent_change(&[], USD).unwrap_err();
        assert!(matches!(err, ReportError::Arithmetic(_)));
    }

    #[tokio::test]
    async fn test_highest_volume_on_empty_fetch() {
        let err = aggregator(vec![]).highest_trading_volume().await.unwrap_err();
        assert!(matches!(err, ReportError::EmptyResult(_)));
    }

    #[tokio::test]
    async fn test_sum_top_n_by_market_cap() {
        let agg = aggregator(vec![
            record("A", 10.111, 0.0),
            record("B", 20.2, 0.0),
            record("C", 0.001, 0.0),
        ]);

        assert_eq!(agg.sum_price_top_n_by_market_cap(2).await.unwrap(), 30.31);
        assert_eq!(agg.sum_price_top_n_by_market_cap(0).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_sum_above_volume_floor() {
        let agg = aggregator(vec![
            CurrencyRecord::new("A", USD, Quote::new(10.0, 80_000_000.0, 0.0, None)),
            CurrencyRecord::new("B", USD, Quote::new(20.0, 50_000_000.0, 0.0, None)),
            CurrencyRecord::new("C", USD, Quote::new(30.0, 100_000_000.0, 0.0, None)),
        ]);

        assert_eq!(agg.sum_price_above_volume(HIGH_VOLUME_FLOOR).await.unwrap(), 40.0);
    }
}
