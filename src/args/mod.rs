//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;


pub use cli::ReplayArgs;
pub use types::{HttpMethod, LineFormat, PositiveUsize, RequestStyle, Scheme};

pub(crate) use defaults::DEFAULT_USER_AGENT;
pub(crate) use parsers::{parse_duration_arg, parse_target};
