use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream;
use thiserror::Error;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::args::PositiveUsize;

use super::request::{RequestDescriptor, RequestKind};

const SUCCESS_STATUS: u16 = 200;
const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(1);
const MIN_PROGRESS_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub timed_out: bool,
}

/// Sends one request and reports its status code.
#[async_trait]
pub trait Transport: Send + Sync {
    /// # Errors
    ///
    /// Returns an error when no complete response was received.
    async fn send(&self, request: &RequestDescriptor) -> Result<u16, TransportError>;
}

#[derive(Debug, Clone, Copy)]
pub struct DispatchPolicy {
    /// Stop after the first non-200 response instead of logging it and moving on.
    pub halt_on_non_success: bool,
    /// Upper bound on outstanding requests; 1 is strictly sequential.
    pub max_in_flight: PositiveUsize,
    /// Period of the progress log line.
    pub progress_interval: Duration,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            halt_on_non_success: false,
            max_in_flight: PositiveUsize::ONE,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    Status(u16),
    Failed(TransportError),
}

#[derive(Debug, Clone)]
pub struct RequestOutcome {
    pub index: usize,
    pub kind: RequestKind,
    pub status: OutcomeStatus,
    pub latency: Duration,
}

impl RequestOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Status(SUCCESS_STATUS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    Completed,
    TransportFailure { index: usize, message: String },
    HaltedOnStatus { index: usize, status: u16 },
}

impl Termination {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Termination::Completed => "completed",
            Termination::TransportFailure { .. } => "transport_failure",
            Termination::HaltedOnStatus { .. } => "halted",
        }
    }

    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Termination::Completed)
    }
}

#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub planned: usize,
    pub outcomes: Vec<RequestOutcome>,
    pub termination: Termination,
    pub elapsed: Duration,
}

impl DispatchReport {
    #[must_use]
    pub fn sent(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.is_success())
            .count()
    }

    /// Responses that arrived with a status other than 200.
    #[must_use]
    pub fn non_success(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| {
                matches!(outcome.status, OutcomeStatus::Status(status) if status != SUCCESS_STATUS)
            })
            .count()
    }

    #[must_use]
    pub fn transport_failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome.status, OutcomeStatus::Failed(_)))
            .count()
    }

    /// Transport failures caused by the client timeouts.
    #[must_use]
    pub fn timeouts(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(&outcome.status, OutcomeStatus::Failed(err) if err.timed_out))
            .count()
    }

    #[must_use]
    pub fn trailers_sent(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.kind == RequestKind::Trailer)
            .count()
    }
}

/// `done/total @ rate req/s`, with the rate in whole requests per second.
#[must_use]
pub fn progress_line(done: usize, total: usize, elapsed: Duration) -> String {
    let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    let rate = u64::try_from(done)
        .unwrap_or(u64::MAX)
        .checked_mul(1000)
        .and_then(|scaled| scaled.checked_div(elapsed_ms))
        .unwrap_or(0);
    format!("{}/{} @ {} req/s", done, total, rate)
}

async fn submit<T>(transport: &T, request: &RequestDescriptor) -> RequestOutcome
where
    T: Transport + ?Sized,
{
    debug!(
        "Sending #{} {} {}",
        request.index,
        request.method.as_str(),
        request.url
    );
    let start = Instant::now();
    let status = match transport.send(request).await {
        Ok(status) => OutcomeStatus::Status(status),
        Err(err) => OutcomeStatus::Failed(err),
    };
    RequestOutcome {
        index: request.index,
        kind: request.kind,
        status,
        latency: start.elapsed(),
    }
}

fn verdict(outcome: &RequestOutcome, policy: DispatchPolicy) -> Option<Termination> {
    match &outcome.status {
        OutcomeStatus::Status(SUCCESS_STATUS) => None,
        OutcomeStatus::Status(status) => {
            println!("Request returned status code {}.", status);
            if policy.halt_on_non_success {
                error!(
                    "Request #{} returned status {}; halting run.",
                    outcome.index, status
                );
                Some(Termination::HaltedOnStatus {
                    index: outcome.index,
                    status: *status,
                })
            } else {
                warn!("Request #{} returned status {}.", outcome.index, status);
                None
            }
        }
        OutcomeStatus::Failed(err) => {
            println!("Exception occurred while parsing response");
            if err.timed_out {
                error!("Request #{} timed out: {}", outcome.index, err);
            } else {
                error!("Request #{} failed: {}", outcome.index, err);
            }
            Some(Termination::TransportFailure {
                index: outcome.index,
                message: err.message.clone(),
            })
        }
    }
}

/// Sends `requests` in order and folds their outcomes.
///
/// At most `policy.max_in_flight` requests are outstanding. A request is only
/// pulled from the batch once the caller has consumed enough earlier outcomes
/// to free a slot, so with a bound of 1 request `i + 1` is never submitted
/// before the outcome of `i` is known. Outcomes are folded in submission order.
/// The first transport failure, or the first non-200 status when halting is
/// enabled, stops the run and drops anything still outstanding. Progress is
/// logged every `policy.progress_interval`.
pub async fn dispatch<T>(
    transport: &T,
    requests: &[RequestDescriptor],
    policy: DispatchPolicy,
) -> DispatchReport
where
    T: Transport + ?Sized,
{
    let mut outcomes = Vec::with_capacity(requests.len());
    let mut termination = Termination::Completed;

    let start = Instant::now();
    let mut in_flight = stream::iter(requests)
        .map(|request| submit(transport, request))
        .buffered(policy.max_in_flight.get());

    let period = policy.progress_interval.max(MIN_PROGRESS_INTERVAL);
    let first_tick = start.checked_add(period).unwrap_or(start);
    let mut progress = tokio::time::interval_at(first_tick, period);
    progress.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            next = in_flight.next() => {
                let Some(outcome) = next else {
                    break;
                };
                debug!("Request #{} finished: {:?}", outcome.index, outcome.status);
                let stop = verdict(&outcome, policy);
                outcomes.push(outcome);
                if let Some(stop) = stop {
                    termination = stop;
                    break;
                }
            }
            _ = progress.tick() => {
                info!(
                    "Progress: {}",
                    progress_line(outcomes.len(), requests.len(), start.elapsed())
                );
            }
        }
    }
    let elapsed = start.elapsed();
    drop(in_flight);

    DispatchReport {
        planned: requests.len(),
        outcomes,
        termination,
        elapsed,
    }
}
