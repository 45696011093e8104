//! Mock host implementation
//!
//! Targets, symbol lists, and counters live behind a `Mutex` so the host
//! can be driven through `&self` like any other [`BuildHost`].

use std::sync::Mutex;

use crate::host::{BuildHost, HostError, TargetId};

use super::failure::{FailureConfig, FailureInjector, HostOp};

/// One registered mock target
#[derive(Debug, Clone)]
struct MockTarget {
    id: TargetId,
    supported: bool,
    symbols: Vec<String>,
}

#[derive(Debug, Default)]
struct MockState {
    targets: Vec<MockTarget>,
    write_count: u32,
    reload_count: u32,
}

/// Configurable mock build host for tests
#[derive(Debug, Default)]
pub struct MockHost {
    state: Mutex<MockState>,
    failures: Mutex<FailureInjector>,
}

impl MockHost {
    /// Create a mock host with no targets
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock host with the given supported targets, all empty
    pub fn with_targets(names: &[&str]) -> Self {
        let host = Self::new();
        for name in names {
            host.add_target(TargetId::new(*name), true);
        }
        host
    }

    /// Register a target
    pub fn add_target(&self, id: TargetId, supported: bool) {
        let mut state = self.state.lock().unwrap();
        state.targets.push(MockTarget {
            id,
            supported,
            symbols: Vec::new(),
        });
    }

    /// Replace a target's stored symbol list without counting a write
    pub fn seed_symbols(&self, target: &TargetId, symbols: &[&str]) {
        let mut state = self.state.lock().unwrap();
        if let Some(entry) = state.targets.iter_mut().find(|t| t.id == *target) {
            entry.symbols = symbols.iter().map(|s| s.to_string()).collect();
        }
    }

    /// Flip a target's supported flag
    pub fn set_supported(&self, target: &TargetId, supported: bool) {
        let mut state = self.state.lock().unwrap();
        if let Some(entry) = state.targets.iter_mut().find(|t| t.id == *target) {
            entry.supported = supported;
        }
    }

    /// Stored symbol list for a target (empty if unknown)
    pub fn symbols_for(&self, target: &TargetId) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .targets
            .iter()
            .find(|t| t.id == *target)
            .map(|t| t.symbols.clone())
            .unwrap_or_default()
    }

    /// Number of successful symbol-list writes so far
    pub fn write_count(&self) -> u32 {
        self.state.lock().unwrap().write_count
    }

    /// Number of reload requests so far
    pub fn reload_count(&self) -> u32 {
        self.state.lock().unwrap().reload_count
    }

    /// Inject a failure for an operation, optionally scoped to one target
    pub fn inject_failure(&self, op: HostOp, target: Option<TargetId>, config: FailureConfig) {
        self.failures.lock().unwrap().inject(op, target, config);
    }

    /// Make every write for one target fail
    pub fn fail_writes_for(&self, target: &TargetId, message: impl Into<String>) {
        self.inject_failure(
            HostOp::WriteSymbols,
            Some(target.clone()),
            FailureConfig::error(message),
        );
    }

    /// Remove all injected failures
    pub fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
    }
}

impl BuildHost for MockHost {
    fn valid_targets(&self) -> Vec<TargetId> {
        let state = self.state.lock().unwrap();
        state.targets.iter().map(|t| t.id.clone()).collect()
    }

    fn is_supported(&self, target: &TargetId) -> bool {
        let state = self.state.lock().unwrap();
        state
            .targets
            .iter()
            .find(|t| t.id == *target)
            .map(|t| t.supported)
            .unwrap_or(false)
    }

    fn define_symbols(&self, target: &TargetId) -> Result<Vec<String>, HostError> {
        if self
            .failures
            .lock()
            .unwrap()
            .check(HostOp::ReadSymbols, target)
            .is_some()
        {
            return Err(HostError::Unsupported(target.clone()));
        }

        let state = self.state.lock().unwrap();
        state
            .targets
            .iter()
            .find(|t| t.id == *target)
            .map(|t| t.symbols.clone())
            .ok_or_else(|| HostError::Unsupported(target.clone()))
    }

    fn set_define_symbols(&self, target: &TargetId, symbols: &[String]) -> Result<(), HostError> {
        if let Some(reason) = self
            .failures
            .lock()
            .unwrap()
            .check(HostOp::WriteSymbols, target)
        {
            return Err(HostError::WriteFailure {
                target: target.clone(),
                reason,
            });
        }

        let mut state = self.state.lock().unwrap();
        let entry = state
            .targets
            .iter_mut()
            .find(|t| t.id == *target)
            .ok_or_else(|| HostError::Unsupported(target.clone()))?;
        entry.symbols = symbols.to_vec();
        state.write_count += 1;
        Ok(())
    }

    fn request_reload(&self) {
        self.state.lock().unwrap().reload_count += 1;
    }
}
