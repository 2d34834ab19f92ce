//! Error taxonomy for a reporting cycle
//!
//! None of these are recovered from inside a cycle: the first one aborts the
//! cycle, stops the scheduler and terminates the process.

#[derive(Debug)]
pub enum ReportError {
    /// Network failure, non-2xx status, or an API-level error status
    Transport(String),
    /// Response body that does not match the expected listings shape
    MalformedResponse(String),
    /// Zero records where at least one is required
    EmptyResult(String),
    /// Division by zero while reconstructing yesterday's prices
    Arithmetic(String),
    /// Filesystem failure writing or reading a report
    Persistence(std::io::Error),
    Serialization(serde_json::Error),
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        ReportError::Persistence(err)
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::Serialization(err)
    }
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::Transport(msg) => write!(f, "Transport error: {}", msg),
            ReportError::MalformedResponse(msg) => write!(f, "Malformed response: {}", msg),
            ReportError::EmptyResult(msg) => write!(f, "Empty result: {}", msg),
            ReportError::Arithmetic(msg) => write!(f, "Arithmetic error: {}", msg),
            ReportError::Persistence(e) => write!(f, "Persistence error: {}", e),
            ReportError::Serialization(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Persistence(e) => Some(e),
            ReportError::Serialization(e) => Some(e),
            _ => None,
        }
    }
}
