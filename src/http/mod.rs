//! Request construction and dispatch.
mod client;
mod dispatch;
mod execution;
mod request;


pub use client::{ClientSettings, HttpTransport};
pub use dispatch::{
    DispatchPolicy, DispatchReport, OutcomeStatus, RequestOutcome, Termination, Transport,
    TransportError, dispatch, progress_line,
};
pub use request::{RequestDescriptor, RequestKind, RequestPlan, build_requests};
