//! Core library for the `workload-replay` CLI.
//!
//! A run reads a workload file, routes each line to a target host, sends the
//! resulting requests with a bounded number in flight (one by default), and
//! reports the elapsed wall-clock time. The binary is the primary interface;
//! the modules are public so the pieces can be driven and tested on their own.
pub mod args;
pub mod config;
pub mod entry;
pub mod error;
pub mod http;
pub mod report;
pub mod target;
pub mod workload;

mod logger;
