use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Only parameter should be workload filename.")]
    MissingWorkloadArgument,
    #[error("Invalid workload path '{value}'.")]
    InvalidWorkloadPath { value: String },
    #[error("Invalid target '{value}'. Expected 'host:port'.")]
    InvalidTargetFormat { value: String },
    #[error("Invalid target '{value}'. Host must not be empty.")]
    TargetHostEmpty { value: String },
    #[error("Invalid port in target '{value}': {source}")]
    InvalidTargetPort {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("At least one target host is required.")]
    NoTargets,
    #[error(
        "{count} targets configured but the '{format}' line format carries no identifier; use --format csv."
    )]
    MultipleTargetsWithoutAffinity { count: usize, format: &'static str },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
