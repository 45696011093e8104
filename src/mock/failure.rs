//! Failure injection for the mock host
//!
//! Lets tests fail symbol reads or writes, globally or for one target,
//! optionally only for the first N calls.

use std::collections::HashMap;

use crate::host::TargetId;

/// Host operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostOp {
    /// Reading a target's define symbol list
    ReadSymbols,
    /// Writing a target's define symbol list
    WriteSymbols,
}

/// Failure configuration for an operation
#[derive(Debug, Clone)]
pub struct FailureConfig {
    /// Error message to surface
    pub message: String,
    /// Number of times to fail before succeeding (None = always fail)
    pub fail_count: Option<u32>,
}

impl FailureConfig {
    /// Create a config that always fails with this message
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fail_count: None,
        }
    }

    /// Limit the failure to the first `count` calls
    pub fn with_fail_count(mut self, count: u32) -> Self {
        self.fail_count = Some(count);
        self
    }
}

/// Failure injector for the mock host
#[derive(Debug, Default)]
pub struct FailureInjector {
    /// Configs keyed by operation and optional target (None = any target)
    configs: HashMap<(HostOp, Option<TargetId>), FailureConfig>,
    /// Calls already failed per config key
    fail_counts: HashMap<(HostOp, Option<TargetId>), u32>,
}

impl FailureInjector {
    /// Create an injector with no failures configured
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject a failure for an operation, optionally scoped to one target
    pub fn inject(&mut self, op: HostOp, target: Option<TargetId>, config: FailureConfig) {
        let key = (op, target);
        self.fail_counts.insert(key.clone(), 0);
        self.configs.insert(key, config);
    }

    /// Remove all injected failures
    pub fn clear(&mut self) {
        self.configs.clear();
        self.fail_counts.clear();
    }

    /// Check whether this call should fail; returns the error message if so
    pub fn check(&mut self, op: HostOp, target: &TargetId) -> Option<String> {
        let keys = [(op, Some(target.clone())), (op, None)];
        for key in keys {
            let Some(config) = self.configs.get(&key) else {
                continue;
            };
            let failed = self.fail_counts.entry(key).or_insert(0);
            if config.fail_count.map_or(true, |limit| *failed < limit) {
                *failed += 1;
                return Some(config.message.clone());
            }
        }
        None
    }
}
