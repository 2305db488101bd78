use thiserror::Error;

use super::{ConfigError, HttpError, ReportError, ValidationError, WorkloadError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Workload error: {0}")]
    Workload(#[from] WorkloadError),
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation<E>(error: E) -> Self
    where
        E: Into<ValidationError>,
    {
        error.into().into()
    }

    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn workload<E>(error: E) -> Self
    where
        E: Into<WorkloadError>,
    {
        error.into().into()
    }

    pub fn http<E>(error: E) -> Self
    where
        E: Into<HttpError>,
    {
        error.into().into()
    }

    pub fn report<E>(error: E) -> Self
    where
        E: Into<ReportError>,
    {
        error.into().into()
    }

    /// The underlying message without the category prefix, as printed on stdout.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            AppError::Io { source } => source.to_string(),
            AppError::Clap { source } => source.to_string(),
            AppError::Validation(err) => err.to_string(),
            AppError::Config(err) => err.to_string(),
            AppError::Workload(err) => err.to_string(),
            AppError::Http(err) => err.to_string(),
            AppError::Report(err) => err.to_string(),
        }
    }
}
