use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to serialize summary: {source}")]
    SerializeSummary {
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to write summary '{path}': {source}")]
    WriteSummary {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to create latency histogram: {message}")]
    Histogram { message: String },
}
