use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::args::LineFormat;
use crate::error::{AppError, AppResult, ValidationError, WorkloadError};

use super::parse::{WorkloadLine, parse_workload};

/// Maps the CLI workload argument onto `workload_dir`, keeping only its basename.
///
/// # Errors
///
/// Returns `InvalidWorkloadPath` when the argument has no file name component.
pub fn resolve_workload_path(argument: &str, workload_dir: &Path) -> AppResult<PathBuf> {
    let file_name = Path::new(argument).file_name().ok_or_else(|| {
        AppError::validation(ValidationError::InvalidWorkloadPath {
            value: argument.to_owned(),
        })
    })?;
    Ok(workload_dir.join(file_name))
}

/// Reads and parses the workload at `path`.
///
/// # Errors
///
/// Returns an error when the file does not exist, cannot be read, or contains
/// a malformed line.
pub fn load_workload(
    path: &Path,
    format: LineFormat,
    identifier_field: usize,
) -> AppResult<Vec<WorkloadLine>> {
    if !path.is_file() {
        return Err(AppError::workload(WorkloadError::NotFound {
            path: path.to_path_buf(),
        }));
    }
    let content = std::fs::read_to_string(path).map_err(|err| {
        AppError::workload(WorkloadError::Read {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    debug!("Read {} bytes from {}", content.len(), path.display());

    let lines = parse_workload(&content, format, identifier_field)?;
    info!(
        "Loaded {} workload lines from {} ({} format)",
        lines.len(),
        path.display(),
        format.as_str()
    );
    Ok(lines)
}
