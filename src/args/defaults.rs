use crate::target::TargetHost;

pub(crate) const DEFAULT_USER_AGENT: &str =
    concat!("workload-replay/", env!("CARGO_PKG_VERSION"));

/// Directory workload files are read from; only the basename of the CLI path is kept.
pub(crate) const DEFAULT_WORKLOAD_DIR: &str = "/workloads";

/// Control command the transaction servers treat as "flush the audit log".
pub(crate) const DEFAULT_TRAILER_BODY: &str = "[1200000] DUMPLOG,./testLOG";

pub(crate) const DEFAULT_IDENTIFIER_FIELD: usize = 1;

const DEFAULT_TARGET_HOST: &str = "transaction-server";
const DEFAULT_TARGET_PORT: u16 = 5000;

pub(crate) fn default_targets() -> Vec<TargetHost> {
    vec![TargetHost::new(DEFAULT_TARGET_HOST, DEFAULT_TARGET_PORT)]
}
