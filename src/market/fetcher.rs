//! Fetcher trait for listings
//!
//! The report aggregations only ever see this trait, so they run the same
//! against the live API and against canned data.

use super::types::{CurrencyRecord, ListingsQuery, SortDirection};
use crate::error::ReportError;
use async_trait::async_trait;
use std::cmp::Ordering;

/// Source of listings for one query
#[async_trait]
pub trait ListingsFetcher: Send + Sync {
    /// Fetch the listings matching `query`, in the order the source ranks them
    async fn fetch_listings(&self, query: &ListingsQuery) -> Result<Vec<CurrencyRecord>, ReportError>;

    /// Get source name for logging
    fn source_name(&self) -> &'static str;
}

/// Answers every query from one batch of records held in memory
///
/// Applies the query the way the listings endpoint does: volume floor, then
/// sort, then `start`/`limit`. Records lacking the sort value go last.
/// Feeding it one full download gives a report where every section sees the
/// same snapshot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotFetcher {
    records: Vec<CurrencyRecord>,
}

impl SnapshotFetcher {
    pub fn new(records: Vec<CurrencyRecord>) -> Self {
        Self { records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn select(&self, query: &ListingsQuery) -> Result<Vec<CurrencyRecord>, ReportError> {
        let mut selected = Vec::with_capacity(self.records.len());
        for record in &self.records {
            let quote = record.quote_in(&query.convert)?;
            if let Some(min) = query.volume_24h_min {
                if quote.volume_24h < min {
                    continue;
                }
            }
            selected.push((record, quote));
        }

        if let Some(field) = query.sort {
            let direction = query.sort_dir.unwrap_or(SortDirection::Descending);
            selected.sort_by(|(_, a), (_, b)| {
                match (field.value_of(a), field.value_of(b)) {
                    (Some(x), Some(y)) => {
                        let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
                        match direction {
                            SortDirection::Ascending => ord,
                            SortDirection::Descending => ord.reverse(),
                        }
                    }
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            });
        }

        let skip = query.start.saturating_sub(1);
        let take = query.limit.unwrap_or(usize::MAX);

        Ok(selected
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|(record, _)| record.clone())
            .collect())
    }
}

#[async_trait]
impl ListingsFetcher for SnapshotFetcher {
    async fn fetch_listings(&self, query: &ListingsQuery) -> Result<Vec<CurrencyRecord>, ReportError> {
        let records = self.select(query)?;
        log::debug!(
            "Snapshot answered {:?} with {} of {} records",
            query.to_query_pairs(),
            records.len(),
            self.records.len()
        );
        Ok(records)
    }

    fn source_name(&self) -> &'static str {
        "snapshot"
    }
}
