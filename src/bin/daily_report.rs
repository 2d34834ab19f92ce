//! Daily Report Runtime
//!
//! Fetches CoinMarketCap listings, prints the daily digest to stdout and
//! saves the report under the report directory, then waits for the next
//! cycle. Stops cleanly on CTRL+C; exits non-zero on the first failed cycle.
//!
//! Usage:
//!   cargo run --release --bin daily_report
//!
//! Environment variables:
//!   CMC_API_KEY - API key (required)
//!   CMC_BASE_URL - API root (default: https://pro-api.coinmarketcap.com)
//!   CMC_ACCEPT_HEADER - Accepts header (default: application/json)
//!   REPORT_DIR - Output directory (default: report/ next to the binary)
//!   REPORT_INTERVAL_SECS - Cadence (default: 86400)
//!   CMC_REQUEST_TIMEOUT_SECS - HTTP timeout (default: none)

use coinreport::runtime::run_reporter;
use coinreport::ReporterConfig;
use dotenv::dotenv;
use log::{error, info, warn};
use std::process::ExitCode;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    dotenv().ok();

    let config = ReporterConfig::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.rust_log))
        .target(env_logger::Target::Stderr)
        .init();

    info!("🚀 Starting daily CoinMarketCap report");
    info!("   ├─ API: {}", config.base_url);
    info!("   ├─ Report directory: {}", config.report_dir.display());
    info!("   ├─ Interval: {}s", config.interval.as_secs());
    info!("   └─ Request timeout: {:?}", config.request_timeout);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("⚠️  Received CTRL+C, shutting down...");
                let _ = shutdown_tx.send(true);
            }
            Err(err) => {
                error!("❌ Failed to listen for CTRL+C: {}", err);
                // Keep the sender alive so the scheduler doesn't read a closed channel as shutdown
                std::future::pending::<()>().await;
            }
        }
    });

    match run_reporter(&config, shutdown_rx).await {
        Ok(completed) => {
            info!("✅ Report runtime stopped after {} cycle(s)", completed);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("❌ Report runtime failed: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
