use crate::args::LineFormat;
use crate::error::WorkloadError;

/// One line of a workload file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadLine {
    pub raw: String,
    /// Leading token dropped from numbered lines, e.g. `[12]`.
    pub sequence: Option<String>,
    pub body: String,
    pub identifier: Option<String>,
}

/// Parses a single non-blank line. `line` is the 1-based line number used in errors.
///
/// # Errors
///
/// Returns an error when a numbered line has no separating space, or a csv
/// line has no field at `identifier_field`.
pub fn parse_line(
    line: usize,
    raw: &str,
    format: LineFormat,
    identifier_field: usize,
) -> Result<WorkloadLine, WorkloadError> {
    match format {
        LineFormat::Raw => Ok(WorkloadLine {
            raw: raw.to_owned(),
            sequence: None,
            body: raw.to_owned(),
            identifier: None,
        }),
        LineFormat::Numbered => {
            let (sequence, body) = raw.split_once(' ').ok_or_else(|| {
                WorkloadError::MissingSequenceSeparator {
                    line,
                    raw: raw.to_owned(),
                }
            })?;
            Ok(WorkloadLine {
                raw: raw.to_owned(),
                sequence: Some(sequence.to_owned()),
                body: body.to_owned(),
                identifier: None,
            })
        }
        LineFormat::Csv => {
            let field = raw.split(',').nth(identifier_field).ok_or_else(|| {
                WorkloadError::MissingIdentifierField {
                    line,
                    field: identifier_field,
                    raw: raw.to_owned(),
                }
            })?;
            Ok(WorkloadLine {
                raw: raw.to_owned(),
                sequence: None,
                body: raw.to_owned(),
                identifier: Some(field.replace(['\n', '\r', ' '], "")),
            })
        }
    }
}

/// Parses every line of a workload, skipping blank ones.
///
/// # Errors
///
/// Returns the first line error; a malformed line fails the whole workload.
pub fn parse_workload(
    content: &str,
    format: LineFormat,
    identifier_field: usize,
) -> Result<Vec<WorkloadLine>, WorkloadError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, raw)| !raw.trim().is_empty())
        .map(|(index, raw)| parse_line(index.saturating_add(1), raw, format, identifier_field))
        .collect()
}
