//! # coinreport
//!
//! Daily CoinMarketCap digest: fetch listings, derive six summary figures,
//! print them, and persist the report as a timestamped JSON file.
//!
//! ## Architecture
//!
//! ```text
//! DailyScheduler (run now, then every 24h, until shutdown)
//!     ↓
//! ReportCycle::run_once
//!     ├─ ReportAggregator ← ListingsFetcher (CoinMarketCapClient | SnapshotFetcher)
//!     ├─ write_digest → stdout
//!     └─ ReportSink (JsonReportWriter) → report/<timestamp>.json
//! ```
//!
//! ## Module Organization
//!
//! - `market` - Listing types, query parameters, fetchers
//! - `report` - Aggregations, report type, digest, persistence
//! - `scheduler` - Cancellable periodic runner
//! - `runtime` - Live pipeline wiring used by the `daily_report` binary
//! - `config` - Environment configuration
//! - `error` - Error taxonomy

pub mod config;
pub mod error;
pub mod market;
pub mod report;
pub mod runtime;
pub mod scheduler;

pub use config::{ConfigError, ReporterConfig};
pub use error::ReportError;
pub use report::{Report, ReportAggregator, ReportCycle};
pub use runtime::run_reporter;
pub use scheduler::DailyScheduler;
