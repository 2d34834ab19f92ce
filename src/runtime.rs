//! Report runtime
//!
//! Builds the live pipeline from a `ReporterConfig` and drives it until
//! shutdown:
//!
//! ```text
//! CoinMarketCapClient → ReportAggregator → ReportCycle(JsonReportWriter)
//!                                               ↑
//!                                        DailyScheduler
//! ```

use crate::config::ReporterConfig;
use crate::error::ReportError;
use crate::market::CoinMarketCapClient;
use crate::report::{JsonReportWriter, ReportAggregator, ReportCycle};
use crate::scheduler::DailyScheduler;
use std::sync::Arc;
use tokio::sync::watch;

/// Run report cycles against the CoinMarketCap API until `shutdown` turns
/// true, printing each digest to stdout
///
/// Returns the number of completed cycles, or the error that ended the
/// first failed one.
pub async fn run_reporter(
    config: &ReporterConfig,
    shutdown: watch::Receiver<bool>,
) -> Result<u64, ReportError> {
    let client = CoinMarketCapClient::new(
        &config.base_url,
        &config.api_key,
        &config.accept_header,
        config.request_timeout,
    )?;
    let aggregator = ReportAggregator::new(Arc::new(client));
    let writer = JsonReportWriter::new(config.report_dir.clone());
    let cycle = ReportCycle::new(aggregator, Box::new(writer));

    let scheduler = DailyScheduler::new(config.interval);
    let cycle = &cycle;
    scheduler
        .run(shutdown, |_iteration| async move {
            let mut stdout = std::io::stdout();
            cycle.run_once(&mut stdout).await.map(|_| ())
        })
        .await
}
