//! Report persistence
//!
//! Each report lands in its own file, `<YYYY-MM-DD_HH:MM:SS>.json`, inside
//! the report directory. Files are never rewritten or rotated.

use super::types::Report;
use crate::error::ReportError;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Backend trait for persisting finished reports
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Persist `report`, named after `created_at`; returns where it went
    async fn write_report(&self, report: &Report, created_at: DateTime<Local>) -> Result<PathBuf, ReportError>;

    /// Get backend type for logging
    fn backend_type(&self) -> &'static str;
}

/// Outcome of creating the report directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirStatus {
    Created,
    AlreadyPresent,
}

/// Create `dir` unless it already exists as a directory
///
/// Its parent must exist. Any failure other than "already a directory" is
/// returned as `Persistence`.
pub fn ensure_report_dir(dir: &Path) -> Result<DirStatus, ReportError> {
    match fs::create_dir(dir) {
        Ok(()) => Ok(DirStatus::Created),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && dir.is_dir() => Ok(DirStatus::AlreadyPresent),
        Err(e) => Err(ReportError::Persistence(e)),
    }
}

/// File name for a report created at `created_at`
pub fn report_file_name(created_at: DateTime<Local>) -> String {
    created_at.format("%Y-%m-%d_%H:%M:%S.json").to_string()
}

/// Serialize with 4-space indentation
pub fn to_indented_json(report: &Report) -> Result<Vec<u8>, ReportError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    report.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Load a report written by `JsonReportWriter`
pub fn read_report(path: &Path) -> Result<Report, ReportError> {
    let json = fs::read_to_string(path)?;
    let report = serde_json::from_str(&json)?;
    Ok(report)
}

/// Writes each report as an indented JSON document
pub struct JsonReportWriter {
    dir: PathBuf,
}

impl JsonReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn write(&self, report: &Report, created_at: DateTime<Local>) -> Result<PathBuf, ReportError> {
        match ensure_report_dir(&self.dir)? {
            DirStatus::Created => log::info!("📁 Created report directory: {}", self.dir.display()),
            DirStatus::AlreadyPresent => {}
        }

        let path = self.dir.join(report_file_name(created_at));
        let json = to_indented_json(report)?;
        fs::write(&path, json)?;

        log::info!("💾 Saved report to {}", path.display());
        Ok(path)
    }
}

#[async_trait]
impl ReportSink for JsonReportWriter {
    async fn write_report(&self, report: &Report, created_at: DateTime<Local>) -> Result<PathBuf, ReportError> {
        self.write(report, created_at)
    }

    fn backend_type(&self) -> &'static str {
        "JSON"
    }
}
