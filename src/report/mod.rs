//! Daily report: derivation, console digest, persistence
//!
//! ```text
//! ListingsFetcher → ReportAggregator::build_report → Report
//!     ↓
//! write_digest → stdout
//!     ↓
//! ReportSink (JsonReportWriter) → report/<timestamp>.json
//! ```

pub mod aggregator;
pub mod cycle;
pub mod digest;
pub mod types;
pub mod writer;

pub use aggregator::{ReportAggregator, HIGH_VOLUME_FLOOR, TOP_MARKET_CAP_COUNT, TOP_MOVERS_COUNT};
pub use cycle::{CycleOutcome, ReportCycle};
pub use digest::write_digest;
pub use types::Report;
pub use writer::{ensure_report_dir, read_report, DirStatus, JsonReportWriter, ReportSink};
