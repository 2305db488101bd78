use clap::Parser;
use std::time::Duration;

use crate::target::TargetHost;

use super::defaults::{
    DEFAULT_IDENTIFIER_FIELD, DEFAULT_TRAILER_BODY, DEFAULT_WORKLOAD_DIR, default_targets,
};
use super::parsers::{parse_duration_arg, parse_positive_usize, parse_target};
use super::types::{HttpMethod, LineFormat, PositiveUsize, RequestStyle, Scheme};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Replay a workload file as HTTP requests against fixed target hosts and report the wall-clock time."
)]
pub struct ReplayArgs {
    /// Workload file; only its basename is used and it is read from --workload-dir
    pub workload: Option<String>,

    /// Directory holding workload files
    #[arg(long = "workload-dir", default_value = DEFAULT_WORKLOAD_DIR)]
    pub workload_dir: String,

    /// Target in 'host:port' format (repeatable; several targets enable affinity routing)
    #[arg(
        long = "target",
        short = 'T',
        value_parser = parse_target,
        default_values_t = default_targets()
    )]
    pub targets: Vec<TargetHost>,

    /// URL scheme used for every target
    #[arg(long, default_value = "http", ignore_case = true)]
    pub scheme: Scheme,

    /// HTTP method to use
    #[arg(long, short = 'X', default_value = "post", ignore_case = true)]
    pub method: HttpMethod,

    /// Workload line format
    #[arg(long = "format", short = 'f', default_value = "numbered")]
    pub line_format: LineFormat,

    /// Zero-based comma field holding the affinity identifier (csv format)
    #[arg(long = "identifier-field", default_value_t = DEFAULT_IDENTIFIER_FIELD)]
    pub identifier_field: usize,

    /// Place each line in the request body or in the URL path
    #[arg(long = "style", default_value = "body")]
    pub request_style: RequestStyle,

    /// Send one control request to every target after the workload
    #[arg(long = "trailers")]
    pub trailers: bool,

    /// Body of the per-target control request
    #[arg(long = "trailer-body", default_value = DEFAULT_TRAILER_BODY)]
    pub trailer_body: String,

    /// Stop the run (exit 1) on the first non-200 response
    #[arg(long = "halt-on-error")]
    pub halt_on_non_success: bool,

    /// Requests outstanding at once (1 keeps the sequential baseline)
    #[arg(
        long = "max-in-flight",
        default_value = "1",
        value_parser = parse_positive_usize
    )]
    pub max_in_flight: PositiveUsize,

    /// Request timeout (supports ms/s/m/h)
    #[arg(long = "timeout", default_value = "30s", value_parser = parse_duration_arg)]
    pub request_timeout: Duration,

    /// Connect timeout (supports ms/s/m/h)
    #[arg(long = "connect-timeout", default_value = "5s", value_parser = parse_duration_arg)]
    pub connect_timeout: Duration,

    /// Period of the progress log line (supports ms/s/m/h)
    #[arg(long = "progress-interval", default_value = "1s", value_parser = parse_duration_arg)]
    pub progress_interval: Duration,

    /// Path to config file (TOML or JSON)
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Write the run summary as JSON to this path
    #[arg(long = "summary-json")]
    pub summary_json: Option<String>,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable ANSI colors in log output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
