use clap::{ArgMatches, CommandFactory, FromArgMatches};
use std::time::Duration;
use tempfile::tempdir;

use super::{apply_config, load_config_file, types::ConfigFile};
use crate::args::{HttpMethod, LineFormat, ReplayArgs, RequestStyle};
use crate::target::TargetHost;

fn parse_cli(argv: &[&str]) -> Result<(ReplayArgs, ArgMatches), String> {
    let matches = ReplayArgs::command()
        .try_get_matches_from(argv.iter().copied())
        .map_err(|err| format!("parse failed: {}", err))?;
    let args = ReplayArgs::from_arg_matches(&matches).map_err(|err| err.to_string())?;
    Ok((args, matches))
}

#[test]
fn parse_toml_config() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("replay.toml");
    let content = r#"
workload_dir = "/srv/workloads"
targets = ["192.168.1.249:4000", "192.168.1.226:4000", "192.168.1.223:4000"]
format = "csv"
trailers = true
halt_on_error = true
timeout = "10s"
"#;
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;

    let config = load_config_file(&path).map_err(|err| err.to_string())?;
    if config.workload_dir.as_deref() != Some("/srv/workloads") {
        return Err("Unexpected workload_dir".to_owned());
    }
    if config.targets.as_ref().map(Vec::len) != Some(3) {
        return Err("Expected three targets".to_owned());
    }
    if config.format != Some(LineFormat::Csv) {
        return Err("Unexpected format".to_owned());
    }
    if config.trailers != Some(true) || config.halt_on_error != Some(true) {
        return Err("Unexpected flags".to_owned());
    }
    Ok(())
}

#[test]
fn parse_json_config_with_hosts_alias() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("replay.json");
    let content = r#"{
  "hosts": ["localhost:80"],
  "method": "get",
  "style": "path",
  "max_in_flight": 4
}"#;
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;

    let config = load_config_file(&path).map_err(|err| err.to_string())?;
    if config.targets != Some(vec!["localhost:80".to_owned()]) {
        return Err(format!("Unexpected targets {:?}", config.targets));
    }
    if config.method != Some(HttpMethod::Get) || config.style != Some(RequestStyle::Path) {
        return Err("Unexpected method/style".to_owned());
    }
    if config.max_in_flight != Some(4) {
        return Err("Unexpected max_in_flight".to_owned());
    }
    Ok(())
}

#[test]
fn unknown_keys_and_extensions_are_rejected() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let toml_path = dir.path().join("replay.toml");
    std::fs::write(&toml_path, "retries = 3\n").map_err(|err| format!("write failed: {}", err))?;
    if load_config_file(&toml_path).is_ok() {
        return Err("Expected error for unknown key".to_owned());
    }

    let yaml_path = dir.path().join("replay.yaml");
    std::fs::write(&yaml_path, "format: csv\n").map_err(|err| format!("write failed: {}", err))?;
    if load_config_file(&yaml_path).is_ok() {
        return Err("Expected error for yaml extension".to_owned());
    }
    Ok(())
}

#[test]
fn config_fills_defaults_but_cli_wins() -> Result<(), String> {
    let (mut args, matches) = parse_cli(&[
        "workload-replay",
        "1userWorkLoad",
        "--format",
        "raw",
        "--timeout",
        "2s",
    ])?;
    let config = ConfigFile {
        targets: Some(vec!["a:1".to_owned(), "b:2".to_owned()]),
        format: Some(LineFormat::Csv),
        trailers: Some(true),
        timeout: Some("9s".to_owned()),
        connect_timeout: Some("750ms".to_owned()),
        progress_interval: Some("5s".to_owned()),
        max_in_flight: Some(3),
        ..ConfigFile::default()
    };
    apply_config(&mut args, &matches, &config).map_err(|err| err.to_string())?;

    if args.targets != vec![TargetHost::new("a", 1), TargetHost::new("b", 2)] {
        return Err(format!("Unexpected targets {:?}", args.targets));
    }
    if args.line_format != LineFormat::Raw {
        return Err("CLI format should win over config".to_owned());
    }
    if args.request_timeout != Duration::from_secs(2) {
        return Err("CLI timeout should win over config".to_owned());
    }
    if args.connect_timeout != Duration::from_millis(750) {
        return Err("Config connect_timeout should apply".to_owned());
    }
    if args.progress_interval != Duration::from_secs(5) {
        return Err("Config progress_interval should apply".to_owned());
    }
    if !args.trailers || args.max_in_flight.get() != 3 {
        return Err("Config trailers/max_in_flight should apply".to_owned());
    }
    Ok(())
}

#[test]
fn invalid_config_values_fail() -> Result<(), String> {
    let (mut args, matches) = parse_cli(&["workload-replay", "w"])?;
    let bad_target = ConfigFile {
        targets: Some(vec!["missing-port".to_owned()]),
        ..ConfigFile::default()
    };
    if apply_config(&mut args, &matches, &bad_target).is_ok() {
        return Err("Expected error for target without port".to_owned());
    }
    let zero_in_flight = ConfigFile {
        max_in_flight: Some(0),
        ..ConfigFile::default()
    };
    if apply_config(&mut args, &matches, &zero_in_flight).is_ok() {
        return Err("Expected error for max_in_flight = 0".to_owned());
    }
    Ok(())
}
