use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkloadError {
    #[error("Invalid workload {path} provided.")]
    NotFound { path: PathBuf },
    #[error("Failed to read workload {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Line {line}: expected '<number> <body>', got '{raw}'.")]
    MissingSequenceSeparator { line: usize, raw: String },
    #[error("Line {line}: missing field {field} in '{raw}'.")]
    MissingIdentifierField {
        line: usize,
        field: usize,
        raw: String,
    },
}
