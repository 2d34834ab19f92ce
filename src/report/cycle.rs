//! One reporting cycle: build, print, persist

use super::aggregator::ReportAggregator;
use super::digest::write_digest;
use super::types::Report;
use super::writer::ReportSink;
use crate::error::ReportError;
use chrono::Local;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug)]
pub struct CycleOutcome {
    pub report: Report,
    pub path: PathBuf,
}

pub struct ReportCycle {
    aggregator: ReportAggregator,
    sink: Box<dyn ReportSink>,
}

impl ReportCycle {
    pub fn new(aggregator: ReportAggregator, sink: Box<dyn ReportSink>) -> Self {
        Self { aggregator, sink }
    }

    /// Build the report, print its digest to `out`, then persist it
    ///
    /// Stops at the first failure; nothing is persisted for a cycle whose
    /// report could not be built.
    pub async fn run_once<W: Write + Send>(&self, out: &mut W) -> Result<CycleOutcome, ReportError> {
        let report = self.aggregator.build_report().await?;
        let created_at = Local::now();

        write_digest(out, &report, created_at)?;
        out.flush()?;

        let path = self.sink.write_report(&report, created_at).await?;
        log::debug!("Report persisted via {} backend", self.sink.backend_type());

        Ok(CycleOutcome { report, path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::SnapshotFetcher;
    use async_trait::async_trait;
    use chrono::{DateTime, Local};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingSink {
        written: Mutex<Vec<Report>>,
    }

    #[async_trait]
    impl ReportSink for Arc<RecordingSink> {
        async fn write_report(&self, report: &Report, _created_at: DateTime<Local>) -> Result<PathBuf, ReportError> {
            self.written.lock().unwrap().push(report.clone());
            Ok(PathBuf::from("memory"))
        }

        fn backend_type(&self) -> &'static str {
            "memory"
        }
    }

    #[tokio::test]
    async fn test_failed_build_persists_nothing() {
        let sink = Arc::new(RecordingSink::default());
        let aggregator = ReportAggregator::new(Arc::new(SnapshotFetcher::default()));
        let cycle = ReportCycle::new(aggregator, Box::new(sink.clone()));

        let mut out = Vec::new();
        let err = cycle.run_once(&mut out).await.unwrap_err();

        assert!(matches!(err, ReportError::EmptyResult(_)));
        assert!(out.is_empty());
        assert!(sink.written.lock().unwrap().is_empty());
    }
}
