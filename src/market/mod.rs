//! Market data: listing types, the fetcher seam, and the CoinMarketCap client
//!
//! ```text
//! ListingsQuery → ListingsFetcher::fetch_listings → Vec<CurrencyRecord>
//!                   ├─ CoinMarketCapClient (HTTP, paginated)
//!                   └─ SnapshotFetcher (one in-memory batch)
//! ```

pub mod types;
pub mod fetcher;
pub mod coinmarketcap;

pub use types::{CurrencyRecord, ListingsQuery, Quote, SortDirection, SortField, USD};
pub use fetcher::{ListingsFetcher, SnapshotFetcher};
pub use coinmarketcap::CoinMarketCapClient;
