use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveUsize, ReplayArgs, parse_duration_arg, parse_target};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

/// Applies configuration values to CLI arguments not set on the command line.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(
    args: &mut ReplayArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "workload_dir")
        && let Some(dir) = config.workload_dir.clone()
    {
        args.workload_dir = dir;
    }

    if !is_cli(matches, "targets")
        && let Some(targets) = config.targets.as_ref()
    {
        let mut parsed = Vec::with_capacity(targets.len());
        for target in targets {
            parsed.push(
                parse_target(target)
                    .map_err(|err| AppError::config(ConfigError::InvalidTarget { source: err }))?,
            );
        }
        args.targets = parsed;
    }

    if !is_cli(matches, "scheme")
        && let Some(scheme) = config.scheme
    {
        args.scheme = scheme;
    }

    if !is_cli(matches, "method")
        && let Some(method) = config.method
    {
        args.method = method;
    }

    if !is_cli(matches, "line_format")
        && let Some(format) = config.format
    {
        args.line_format = format;
    }

    if !is_cli(matches, "identifier_field")
        && let Some(field) = config.identifier_field
    {
        args.identifier_field = field;
    }

    if !is_cli(matches, "request_style")
        && let Some(style) = config.style
    {
        args.request_style = style;
    }

    if !is_cli(matches, "trailers")
        && let Some(trailers) = config.trailers
    {
        args.trailers = trailers;
    }

    if !is_cli(matches, "trailer_body")
        && let Some(body) = config.trailer_body.clone()
    {
        args.trailer_body = body;
    }

    if !is_cli(matches, "halt_on_non_success")
        && let Some(halt) = config.halt_on_error
    {
        args.halt_on_non_success = halt;
    }

    if !is_cli(matches, "max_in_flight")
        && let Some(max_in_flight) = config.max_in_flight
    {
        args.max_in_flight = PositiveUsize::try_from(max_in_flight).map_err(|err| {
            AppError::config(ConfigError::FieldMustBePositive {
                field: "max_in_flight",
                source: err,
            })
        })?;
    }

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_deref()
    {
        args.request_timeout = parse_duration_arg(timeout).map_err(|err| {
            AppError::config(ConfigError::InvalidDuration {
                field: "timeout",
                source: err,
            })
        })?;
    }

    if !is_cli(matches, "connect_timeout")
        && let Some(timeout) = config.connect_timeout.as_deref()
    {
        args.connect_timeout = parse_duration_arg(timeout).map_err(|err| {
            AppError::config(ConfigError::InvalidDuration {
                field: "connect_timeout",
                source: err,
            })
        })?;
    }

    if !is_cli(matches, "progress_interval")
        && let Some(interval) = config.progress_interval.as_deref()
    {
        args.progress_interval = parse_duration_arg(interval).map_err(|err| {
            AppError::config(ConfigError::InvalidDuration {
                field: "progress_interval",
                source: err,
            })
        })?;
    }

    if !is_cli(matches, "summary_json")
        && let Some(path) = config.summary_json.clone()
    {
        args.summary_json = Some(path);
    }

    Ok(())
}
