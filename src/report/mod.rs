//! Run summary: the completion line, detail lines, JSON export and exit status.
mod histogram;


use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use crate::error::{AppError, AppResult, ReportError};
use crate::http::{DispatchReport, Termination};
use crate::target::TargetHost;

pub use histogram::{LatencyHistogram, LatencyPercentiles};

const EXIT_SUCCESS: u8 = 0;
const EXIT_FAILURE: u8 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub workload: String,
    pub targets: Vec<String>,
    pub planned: usize,
    pub sent: usize,
    pub succeeded: usize,
    pub non_success: usize,
    pub transport_failures: usize,
    pub timeouts: usize,
    pub trailers_sent: usize,
    pub elapsed_ms: u64,
    pub throughput_rps: u64,
    pub latency: LatencyPercentiles,
    pub outcome: &'static str,
    #[serde(skip)]
    pub termination: Termination,
}

impl RunSummary {
    /// Folds a dispatch report into run-level aggregates.
    ///
    /// # Errors
    ///
    /// Returns an error when the latency histogram cannot be built.
    pub fn from_dispatch(
        workload: &Path,
        targets: &[TargetHost],
        report: &DispatchReport,
    ) -> AppResult<Self> {
        let mut histogram = LatencyHistogram::new()
            .map_err(|message| AppError::report(ReportError::Histogram { message }))?;
        for outcome in &report.outcomes {
            let latency_ms = u64::try_from(outcome.latency.as_millis()).unwrap_or(u64::MAX);
            histogram
                .record(latency_ms)
                .map_err(|message| AppError::report(ReportError::Histogram { message }))?;
        }

        let elapsed_ms = u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX);
        let sent = report.sent();
        let throughput_rps = u64::try_from(sent)
            .unwrap_or(u64::MAX)
            .checked_mul(1000)
            .and_then(|scaled| scaled.checked_div(elapsed_ms))
            .unwrap_or(0);

        Ok(Self {
            workload: workload.display().to_string(),
            targets: targets.iter().map(ToString::to_string).collect(),
            planned: report.planned,
            sent,
            succeeded: report.succeeded(),
            non_success: report.non_success(),
            transport_failures: report.transport_failures(),
            timeouts: report.timeouts(),
            trailers_sent: report.trailers_sent(),
            elapsed_ms,
            throughput_rps,
            latency: histogram.percentiles(),
            outcome: report.termination.as_str(),
            termination: report.termination.clone(),
        })
    }

    /// `Finished in: <seconds>s.` with millisecond resolution.
    #[must_use]
    pub fn finished_line(&self) -> String {
        format!("Finished in: {}s.", format_seconds(self.elapsed_ms))
    }

    #[must_use]
    pub fn detail_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Workload: {}", self.workload),
            format!("Targets: {}", self.targets.join(", ")),
            format!(
                "Requests: {} planned, {} sent ({} trailers), {} ok, {} non-200, {} failed ({} timed out)",
                self.planned,
                self.sent,
                self.trailers_sent,
                self.succeeded,
                self.non_success,
                self.transport_failures,
                self.timeouts
            ),
            format!("Throughput: {} req/s", self.throughput_rps),
            format!(
                "Latency: p50 {}ms, p90 {}ms, p99 {}ms, max {}ms",
                self.latency.p50_ms, self.latency.p90_ms, self.latency.p99_ms, self.latency.max_ms
            ),
        ];
        match &self.termination {
            Termination::Completed => {}
            Termination::TransportFailure { index, message } => {
                lines.push(format!("Aborted at request #{}: {}", index, message));
            }
            Termination::HaltedOnStatus { index, status } => {
                lines.push(format!("Halted at request #{} (status {})", index, status));
            }
        }
        lines
    }

    /// 0 when the run completed; 1 after a transport failure or a halting status.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        if self.termination.is_fatal() {
            EXIT_FAILURE
        } else {
            EXIT_SUCCESS
        }
    }
}

/// Formats whole milliseconds as fractional seconds, e.g. `1.005`.
#[must_use]
pub fn format_seconds(elapsed_ms: u64) -> String {
    let elapsed = Duration::from_millis(elapsed_ms);
    format!("{}.{:03}", elapsed.as_secs(), elapsed.subsec_millis())
}

/// Writes the summary as pretty JSON.
///
/// # Errors
///
/// Returns an error when serialization or the file write fails.
pub fn write_summary_json(summary: &RunSummary, path: &Path) -> AppResult<()> {
    let json = serde_json::to_string_pretty(summary)
        .map_err(|err| AppError::report(ReportError::SerializeSummary { source: err }))?;
    std::fs::write(path, json).map_err(|err| {
        AppError::report(ReportError::WriteSummary {
            path: path.to_path_buf(),
            source: err,
        })
    })
}
