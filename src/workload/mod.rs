//! Workload files: locating them and turning their lines into request bodies.
mod parse;
mod source;

#[cfg(test)]
mod tests;

pub use parse::{WorkloadLine, parse_line, parse_workload};
pub use source::{load_workload, resolve_workload_path};
