//! Target hosts and per-run affinity routing.
//!
//! A [`TargetResolver`] is built once per run. In single-target mode it always
//! answers with the one configured host. In affinity mode every new identifier
//! takes the host under a round-robin cursor, and repeats of that identifier
//! stick to it for the rest of the run.
use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::args::LineFormat;
use crate::error::ValidationError;


#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TargetHost {
    pub host: String,
    pub port: u16,
}

impl TargetHost {
    #[must_use]
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_owned(),
            port,
        }
    }
}

impl fmt::Display for TargetHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl std::str::FromStr for TargetHost {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::args::parse_target(s)
    }
}

#[derive(Debug)]
enum ResolveMode {
    Single,
    Affinity {
        table: HashMap<String, usize>,
        cursor: usize,
    },
}

#[derive(Debug)]
pub struct TargetResolver {
    hosts: Vec<TargetHost>,
    primary: TargetHost,
    mode: ResolveMode,
}

impl TargetResolver {
    /// Resolver that sends every line to `host`.
    #[must_use]
    pub fn single(host: TargetHost) -> Self {
        Self {
            hosts: vec![host.clone()],
            primary: host,
            mode: ResolveMode::Single,
        }
    }

    /// Round-robin resolver with identifier affinity over `hosts`.
    ///
    /// # Errors
    ///
    /// Returns `NoTargets` when `hosts` is empty.
    pub fn affinity(hosts: Vec<TargetHost>) -> Result<Self, ValidationError> {
        let primary = hosts.first().cloned().ok_or(ValidationError::NoTargets)?;
        Ok(Self {
            hosts,
            primary,
            mode: ResolveMode::Affinity {
                table: HashMap::new(),
                cursor: 0,
            },
        })
    }

    /// Picks the resolver mode for a line format.
    ///
    /// Formats carrying an identifier route by affinity; the others need
    /// exactly one target.
    ///
    /// # Errors
    ///
    /// Returns an error when no targets are given, or when several targets are
    /// given for a format without identifiers.
    pub fn for_format(
        mut hosts: Vec<TargetHost>,
        format: LineFormat,
    ) -> Result<Self, ValidationError> {
        if format.carries_identifier() {
            return Self::affinity(hosts);
        }
        match hosts.len() {
            0 => Err(ValidationError::NoTargets),
            1 => hosts
                .pop()
                .map(Self::single)
                .ok_or(ValidationError::NoTargets),
            count => Err(ValidationError::MultipleTargetsWithoutAffinity {
                count,
                format: format.as_str(),
            }),
        }
    }

    /// Resolves the host for one line.
    ///
    /// Lines without an identifier get the host under the cursor and do not
    /// move it.
    pub fn resolve(&mut self, identifier: Option<&str>) -> &TargetHost {
        let index = match (&mut self.mode, identifier) {
            (ResolveMode::Single, _) => 0,
            (ResolveMode::Affinity { cursor, .. }, None) => *cursor,
            (ResolveMode::Affinity { table, cursor }, Some(identifier)) => {
                if let Some(index) = table.get(identifier) {
                    *index
                } else {
                    let assigned = *cursor;
                    table.insert(identifier.to_owned(), assigned);
                    *cursor = cursor
                        .saturating_add(1)
                        .checked_rem(self.hosts.len())
                        .unwrap_or(0);
                    debug!(
                        "Assigned identifier '{}' to target #{}",
                        identifier, assigned
                    );
                    assigned
                }
            }
        };
        self.hosts.get(index).unwrap_or(&self.primary)
    }

    #[must_use]
    pub fn hosts(&self) -> &[TargetHost] {
        &self.hosts
    }

    #[must_use]
    pub const fn is_affinity(&self) -> bool {
        matches!(self.mode, ResolveMode::Affinity { .. })
    }

    /// Number of distinct identifiers assigned so far.
    #[must_use]
    pub fn assigned(&self) -> usize {
        match &self.mode {
            ResolveMode::Single => 0,
            ResolveMode::Affinity { table, .. } => table.len(),
        }
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        match &self.mode {
            ResolveMode::Single => 0,
            ResolveMode::Affinity { cursor, .. } => *cursor,
        }
    }
}
