//! Process entry: argument parsing, plan building and the dispatch runtime.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::{error, info};

use crate::args::ReplayArgs;
use crate::config::{apply_config, load_config};
use crate::error::{AppError, AppResult, ValidationError};
use crate::http::{
    ClientSettings, DispatchPolicy, HttpTransport, RequestDescriptor, RequestPlan, build_requests,
    dispatch,
};
use crate::report::{RunSummary, write_summary_json};
use crate::target::{TargetHost, TargetResolver};
use crate::workload::{load_workload, resolve_workload_path};

const EXIT_FAILURE: u8 = 1;

/// Everything needed to dispatch, resolved before the first request is sent.
struct ReplayPlan {
    workload_path: PathBuf,
    targets: Vec<TargetHost>,
    requests: Vec<RequestDescriptor>,
    policy: DispatchPolicy,
    client: ClientSettings,
    summary_json: Option<PathBuf>,
}

#[must_use]
pub fn run() -> ExitCode {
    let (args, matches) = match parse_args() {
        Ok(parsed) => parsed,
        Err(code) => return code,
    };

    crate::logger::init_logging(args.verbose, args.no_color);

    match run_with(args, &matches) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            error!("{}", err);
            println!("{}", err.message());
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn parse_args() -> Result<(ReplayArgs, ArgMatches), ExitCode> {
    let matches = match ReplayArgs::command().try_get_matches_from(std::env::args_os()) {
        Ok(matches) => matches,
        Err(err) => {
            let informational = matches!(
                err.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            );
            if let Err(print_err) = err.print() {
                eprintln!("Failed to print CLI output: {}", print_err);
            }
            return Err(if informational {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_FAILURE)
            });
        }
    };
    let args = ReplayArgs::from_arg_matches(&matches)
        .map_err(AppError::from)
        .map_err(|err| {
            eprintln!("{}", err);
            ExitCode::from(EXIT_FAILURE)
        })?;
    Ok((args, matches))
}

fn run_with(mut args: ReplayArgs, matches: &ArgMatches) -> AppResult<u8> {
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, matches, &config)?;
    }

    let plan = build_plan(&args)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(execute_plan(plan))
}

fn build_plan(args: &ReplayArgs) -> AppResult<ReplayPlan> {
    let argument = args
        .workload
        .as_deref()
        .ok_or_else(|| AppError::validation(ValidationError::MissingWorkloadArgument))?;
    let workload_path = resolve_workload_path(argument, Path::new(&args.workload_dir))?;
    let lines = load_workload(&workload_path, args.line_format, args.identifier_field)?;

    let mut resolver = TargetResolver::for_format(args.targets.clone(), args.line_format)?;
    let request_plan = RequestPlan {
        scheme: args.scheme,
        method: args.method,
        style: args.request_style,
        trailer: args.trailers.then(|| args.trailer_body.clone()),
    };
    let requests = build_requests(&lines, &mut resolver, &request_plan)?;

    if resolver.is_affinity() {
        info!(
            "Routed {} distinct identifiers across {} targets",
            resolver.assigned(),
            resolver.hosts().len()
        );
    }
    info!(
        "Prepared {} requests ({} workload lines) with up to {} in flight",
        requests.len(),
        lines.len(),
        args.max_in_flight.get()
    );

    Ok(ReplayPlan {
        workload_path,
        targets: resolver.hosts().to_vec(),
        requests,
        policy: DispatchPolicy {
            halt_on_non_success: args.halt_on_non_success,
            max_in_flight: args.max_in_flight,
            progress_interval: args.progress_interval,
        },
        client: ClientSettings {
            request_timeout: args.request_timeout,
            connect_timeout: args.connect_timeout,
        },
        summary_json: args.summary_json.as_ref().map(PathBuf::from),
    })
}

async fn execute_plan(plan: ReplayPlan) -> AppResult<u8> {
    let transport = HttpTransport::new(plan.client)?;

    println!("started");
    let report = dispatch(&transport, &plan.requests, plan.policy).await;

    let summary = RunSummary::from_dispatch(&plan.workload_path, &plan.targets, &report)?;
    println!("{}", summary.finished_line());
    for line in summary.detail_lines() {
        info!("{}", line);
    }

    if let Some(path) = plan.summary_json.as_deref() {
        write_summary_json(&summary, path)?;
        info!("Summary written to {}", path.display());
    }

    Ok(summary.exit_code())
}
