//! Build host collaborator contract
//!
//! The lane never talks to a concrete engine directly. Everything it needs
//! from the host (declared build targets, per-target define symbol lists,
//! the post-change reload hook) goes through [`BuildHost`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque identifier for one build target configuration.
///
/// The set of valid identifiers is declared by the host and may change
/// between invocations; unknown targets are skipped, never invented.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(String);

impl TargetId {
    /// Create a target id from a host-supplied name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The raw target name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Errors surfaced by a build host
#[derive(Debug, Error)]
pub enum HostError {
    /// The host cannot address this target; callers skip it and continue
    #[error("build target '{0}' is not supported by this host")]
    Unsupported(TargetId),

    /// Writing a target's symbol list failed; isolated per target
    #[error("failed to write define symbols for '{target}': {reason}")]
    WriteFailure { target: TargetId, reason: String },

    /// A symbol would corrupt the stored flag list
    #[error("symbol '{symbol}' is not storable for target '{target}'")]
    InvalidSymbol { target: TargetId, symbol: String },

    /// Underlying IO failure
    #[error("host IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Collaborator contract for a build host holding per-target define
/// symbol lists.
///
/// Implementations use interior mutability; one logical operation
/// completes before the next begins, so `&self` mutation is safe here.
pub trait BuildHost {
    /// Targets the host can currently address, in host-declared order.
    /// Obsolete and unsupported identifiers are already excluded.
    fn valid_targets(&self) -> Vec<TargetId>;

    /// Whether the host can address this target right now
    fn is_supported(&self, target: &TargetId) -> bool;

    /// Current define symbols for one target, already split into a list
    /// with empty and whitespace-only entries discarded.
    fn define_symbols(&self, target: &TargetId) -> Result<Vec<String>, HostError>;

    /// Replace one target's define symbol list
    fn set_define_symbols(&self, target: &TargetId, symbols: &[String]) -> Result<(), HostError>;

    /// Fire-and-forget request for the host to reload after symbol
    /// changes. Callers batch: at most one call per logical operation.
    fn request_reload(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_id_display() {
        let id = TargetId::new("standalone-win64");
        assert_eq!(id.to_string(), "standalone-win64");
        assert_eq!(id.as_str(), "standalone-win64");
    }

    #[test]
    fn test_target_id_ordering() {
        let mut ids = vec![
            TargetId::new("webgl"),
            TargetId::new("android"),
            TargetId::new("ios"),
        ];
        ids.sort();
        assert_eq!(ids[0].as_str(), "android");
        assert_eq!(ids[2].as_str(), "webgl");
    }
}
