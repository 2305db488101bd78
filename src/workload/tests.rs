use std::path::Path;

use tempfile::tempdir;

use super::*;
use crate::args::LineFormat;
use crate::error::{AppError, WorkloadError};

#[test]
fn numbered_lines_drop_the_sequence_token() -> Result<(), String> {
    let lines = parse_workload("1 PING\n2 PING\n", LineFormat::Numbered, 1)
        .map_err(|err| err.to_string())?;
    let bodies: Vec<&str> = lines.iter().map(|line| line.body.as_str()).collect();
    if bodies != ["PING", "PING"] {
        return Err(format!("Unexpected bodies: {:?}", bodies));
    }
    let sequences: Vec<Option<&str>> = lines
        .iter()
        .map(|line| line.sequence.as_deref())
        .collect();
    if sequences != [Some("1"), Some("2")] {
        return Err(format!("Unexpected sequences: {:?}", sequences));
    }
    Ok(())
}

#[test]
fn numbered_line_keeps_everything_after_first_space() -> Result<(), String> {
    let line = parse_line(1, "[7] ADD,oY01WVirLr,63511.53", LineFormat::Numbered, 1)
        .map_err(|err| err.to_string())?;
    if line.sequence.as_deref() != Some("[7]") {
        return Err(format!("Unexpected sequence {:?}", line.sequence));
    }
    if line.body != "ADD,oY01WVirLr,63511.53" {
        return Err(format!("Unexpected body {}", line.body));
    }
    Ok(())
}

#[test]
fn numbered_line_without_space_is_rejected() -> Result<(), String> {
    match parse_workload("1 PING\nPING\n", LineFormat::Numbered, 1) {
        Err(WorkloadError::MissingSequenceSeparator { line: 2, .. }) => Ok(()),
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(lines) => Err(format!("Expected error, got {} lines", lines.len())),
    }
}

#[test]
fn csv_identifier_is_stripped_but_body_is_verbatim() -> Result<(), String> {
    let line = parse_line(1, "[1] ADD, alice ,100\r", LineFormat::Csv, 1)
        .map_err(|err| err.to_string())?;
    if line.identifier.as_deref() != Some("alice") {
        return Err(format!("Unexpected identifier {:?}", line.identifier));
    }
    if line.body != "[1] ADD, alice ,100\r" {
        return Err(format!("Body should be untouched: {:?}", line.body));
    }
    Ok(())
}

#[test]
fn csv_identifier_field_is_configurable() -> Result<(), String> {
    let lines = parse_workload("alice,buy\nbob,sell\n", LineFormat::Csv, 0)
        .map_err(|err| err.to_string())?;
    let identifiers: Vec<Option<&str>> = lines
        .iter()
        .map(|line| line.identifier.as_deref())
        .collect();
    if identifiers != [Some("alice"), Some("bob")] {
        return Err(format!("Unexpected identifiers: {:?}", identifiers));
    }
    Ok(())
}

#[test]
fn csv_line_missing_field_is_rejected() -> Result<(), String> {
    match parse_workload("alice,buy\nDUMPLOG\n", LineFormat::Csv, 1) {
        Err(WorkloadError::MissingIdentifierField { line: 2, field: 1, .. }) => Ok(()),
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(lines) => Err(format!("Expected error, got {} lines", lines.len())),
    }
}

#[test]
fn raw_lines_are_verbatim_and_blank_lines_skipped() -> Result<(), String> {
    let lines = parse_workload("GET /\n\n   \nPOST x y\n", LineFormat::Raw, 1)
        .map_err(|err| err.to_string())?;
    let bodies: Vec<&str> = lines.iter().map(|line| line.body.as_str()).collect();
    if bodies != ["GET /", "POST x y"] {
        return Err(format!("Unexpected bodies: {:?}", bodies));
    }
    Ok(())
}

#[test]
fn workload_path_keeps_only_the_basename() -> Result<(), String> {
    let resolved = resolve_workload_path("some/where/1userWorkLoad", Path::new("/workloads"))
        .map_err(|err| err.to_string())?;
    if resolved != Path::new("/workloads/1userWorkLoad") {
        return Err(format!("Unexpected path {}", resolved.display()));
    }
    if resolve_workload_path("..", Path::new("/workloads")).is_ok() {
        return Err("Expected error for path without a file name".to_owned());
    }
    Ok(())
}

#[test]
fn load_workload_reports_missing_file() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("absent");
    match load_workload(&path, LineFormat::Raw, 1) {
        Err(AppError::Workload(WorkloadError::NotFound { path: missing })) if missing == path => {
            Ok(())
        }
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(_) => Err("Expected error for missing workload".to_owned()),
    }
}

#[test]
fn load_workload_reads_file() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("2userWorkLoad");
    std::fs::write(&path, "[1] ADD,alice,10\n[2] QUOTE,bob,ABC\n")
        .map_err(|err| format!("write failed: {}", err))?;
    let lines = load_workload(&path, LineFormat::Numbered, 1).map_err(|err| err.to_string())?;
    if lines.len() != 2 {
        return Err(format!("Unexpected line count {}", lines.len()));
    }
    if lines.first().map(|line| line.body.as_str()) != Some("ADD,alice,10") {
        return Err("Unexpected first body".to_owned());
    }
    Ok(())
}
