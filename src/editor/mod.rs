//! Interactive define symbol matrix session
//!
//! Loads a snapshot of every valid target's symbol set, lets callers
//! toggle per-target membership or add/remove symbols across all targets,
//! and defers all writes until commit. Dirtiness is tracked by comparing
//! the current snapshot against the one captured at load, as sets; store
//! read order is not stable and must not matter.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::host::{BuildHost, TargetId};

/// Invalid caller operations on an editor session
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditorError {
    /// Symbol name was empty or whitespace-only
    #[error("symbol name is empty")]
    EmptySymbolName,

    /// Symbol is already registered in the session
    #[error("symbol '{0}' is already registered")]
    DuplicateSymbol(String),

    /// Symbol is not registered in the session
    #[error("symbol '{0}' is not registered")]
    UnknownSymbol(String),

    /// Target is not part of the loaded session
    #[error("unknown build target '{0}'")]
    UnknownTarget(TargetId),
}

/// One failed per-target write during commit
#[derive(Debug, Clone, Serialize)]
pub struct CommitFailure {
    /// Target whose write failed
    pub target: TargetId,
    /// Underlying cause
    pub reason: String,
}

/// Summary of one commit
#[derive(Debug, Clone, Serialize)]
pub struct CommitReport {
    /// When the commit finished
    pub created_at: DateTime<Utc>,

    /// Count of targets written successfully
    pub targets_written: usize,

    /// Per-target write failures; these targets keep their stored list
    pub failures: Vec<CommitFailure>,
}

impl CommitReport {
    /// Whether every target wrote cleanly
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Snapshot-based editing session over all valid targets
pub struct SymbolMatrixEditor<'a, H: BuildHost + ?Sized> {
    host: &'a H,
    targets: Vec<TargetId>,
    symbols: Vec<String>,
    original: HashMap<TargetId, HashSet<String>>,
    current: HashMap<TargetId, HashSet<String>>,
    dirty: bool,
}

impl<'a, H: BuildHost + ?Sized> SymbolMatrixEditor<'a, H> {
    /// Open a session by snapshotting every valid target's symbol set
    pub fn load(host: &'a H) -> Self {
        let mut editor = Self {
            host,
            targets: Vec::new(),
            symbols: Vec::new(),
            original: HashMap::new(),
            current: HashMap::new(),
            dirty: false,
        };
        editor.reload();
        editor
    }

    /// Targets in the session, in host-declared order
    pub fn targets(&self) -> &[TargetId] {
        &self.targets
    }

    /// Global symbol union across all targets, sorted
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Whether any target's current set differs from its loaded snapshot
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether a symbol is currently enabled for a target
    pub fn is_enabled(&self, target: &TargetId, symbol: &str) -> bool {
        self.current
            .get(target)
            .map(|set| set.contains(symbol))
            .unwrap_or(false)
    }

    /// Flip a symbol's membership for one target; returns the new state
    pub fn toggle(&mut self, target: &TargetId, symbol: &str) -> Result<bool, EditorError> {
        if !self.symbols.iter().any(|s| s == symbol) {
            return Err(EditorError::UnknownSymbol(symbol.to_string()));
        }
        let set = self
            .current
            .get_mut(target)
            .ok_or_else(|| EditorError::UnknownTarget(target.clone()))?;

        let enabled = if set.contains(symbol) {
            set.remove(symbol);
            false
        } else {
            set.insert(symbol.to_string());
            true
        };

        self.update_dirty();
        Ok(enabled)
    }

    /// Register a new symbol and enable it for every target
    pub fn add_symbol(&mut self, name: &str) -> Result<(), EditorError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditorError::EmptySymbolName);
        }
        if self.symbols.iter().any(|s| s == name) {
            return Err(EditorError::DuplicateSymbol(name.to_string()));
        }

        self.symbols.push(name.to_string());
        self.symbols.sort();
        for set in self.current.values_mut() {
            set.insert(name.to_string());
        }

        self.update_dirty();
        Ok(())
    }

    /// Unregister a symbol and disable it for every target
    pub fn remove_symbol(&mut self, name: &str) -> Result<(), EditorError> {
        let Some(index) = self.symbols.iter().position(|s| s == name) else {
            return Err(EditorError::UnknownSymbol(name.to_string()));
        };

        self.symbols.remove(index);
        for set in self.current.values_mut() {
            set.remove(name);
        }

        self.update_dirty();
        Ok(())
    }

    /// Discard all pending edits and re-read every target's stored list
    pub fn revert(&mut self) {
        self.reload();
    }

    /// Write every target's current set back, sorted, then reload.
    ///
    /// A failed target is logged and reported but does not stop the
    /// remaining targets; the reload notification fires once after all
    /// targets are attempted.
    pub fn commit(&mut self) -> CommitReport {
        let mut targets_written = 0;
        let mut failures = Vec::new();

        for target in &self.targets {
            let mut sorted: Vec<String> = self
                .current
                .get(target)
                .map(|set| set.iter().cloned().collect())
                .unwrap_or_default();
            sorted.sort();

            match self.host.set_define_symbols(target, &sorted) {
                Ok(()) => targets_written += 1,
                Err(e) => {
                    error!(%target, error = %e, "failed to apply define symbols");
                    failures.push(CommitFailure {
                        target: target.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        self.host.request_reload();
        self.reload();

        CommitReport {
            created_at: Utc::now(),
            targets_written,
            failures,
        }
    }

    fn reload(&mut self) {
        self.targets.clear();
        self.symbols.clear();
        self.original.clear();
        self.current.clear();

        for target in self.host.valid_targets() {
            if !self.host.is_supported(&target) {
                debug!(%target, "target not supported, excluded from session");
                continue;
            }
            let symbols = match self.host.define_symbols(&target) {
                Ok(symbols) => symbols,
                Err(e) => {
                    warn!(%target, error = %e, "failed to read define symbols, excluded from session");
                    continue;
                }
            };

            let set: HashSet<String> = symbols.into_iter().collect();
            for symbol in &set {
                if !self.symbols.contains(symbol) {
                    self.symbols.push(symbol.clone());
                }
            }
            self.original.insert(target.clone(), set.clone());
            self.current.insert(target.clone(), set);
            self.targets.push(target);
        }

        self.symbols.sort();
        self.dirty = false;
    }

    fn update_dirty(&mut self) {
        self.dirty = self
            .targets
            .iter()
            .any(|target| self.original.get(target) != self.current.get(target));
    }
}
