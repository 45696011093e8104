//! Mock build host
//!
//! Configurable in-process [`BuildHost`](crate::host::BuildHost) for
//! testing reconcile and editor flows. Supports per-target failure
//! injection and exposes write/reload counters so tests can assert that
//! unchanged runs write nothing and batches reload exactly once.

mod failure;
mod host;

pub use failure::{FailureConfig, FailureInjector, HostOp};
pub use host::MockHost;
