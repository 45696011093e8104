//! Define symbol reconciliation
//!
//! Converges every valid build target's define symbol list to the set
//! derived from the module folders on disk. Managed symbols
//! (`USE_MORN_*`) with no backing folder are removed; symbols outside the
//! managed prefix are never touched. Targets fail in isolation, and the
//! host reload is requested once per run, after all targets are processed.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::host::{BuildHost, TargetId};
use crate::scan::{list_module_folders, ScanError};
use crate::symbol::{derive_symbol_name, is_managed};

/// Per-target result of one reconcile run
#[derive(Debug, Clone, Serialize)]
pub struct TargetOutcome {
    /// Target this outcome describes
    pub target: TargetId,

    /// Symbols added to this target
    pub added: Vec<String>,

    /// Obsolete managed symbols removed from this target
    pub removed: Vec<String>,

    /// Reason this target was skipped, if it was
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
}

impl TargetOutcome {
    fn unchanged(target: TargetId) -> Self {
        Self {
            target,
            added: Vec::new(),
            removed: Vec::new(),
            skipped: None,
        }
    }

    fn skipped(target: TargetId, reason: impl Into<String>) -> Self {
        Self {
            target,
            added: Vec::new(),
            removed: Vec::new(),
            skipped: Some(reason.into()),
        }
    }

    /// Whether this target's stored list was rewritten
    pub fn changed(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }
}

/// Summary of one reconcile run
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    /// When the run finished
    pub created_at: DateTime<Utc>,

    /// Desired symbol set derived from module folders, sorted
    pub desired_symbols: Vec<String>,

    /// Per-target outcomes in host-declared order
    pub targets: Vec<TargetOutcome>,

    /// Count of targets whose stored list was rewritten
    pub targets_changed: usize,

    /// Count of targets skipped (unsupported or failed)
    pub targets_skipped: usize,

    /// Whether a host reload was requested for this run
    pub reload_requested: bool,
}

impl ReconcileReport {
    fn empty() -> Self {
        Self {
            created_at: Utc::now(),
            desired_symbols: Vec::new(),
            targets: Vec::new(),
            targets_changed: 0,
            targets_skipped: 0,
            reload_requested: false,
        }
    }

    /// Whether any target's stored list was rewritten
    pub fn changed(&self) -> bool {
        self.targets_changed > 0
    }
}

/// Converges per-target define symbol lists to the folder-derived set
pub struct Reconciler<'a, H: BuildHost + ?Sized> {
    host: &'a H,
}

impl<'a, H: BuildHost + ?Sized> Reconciler<'a, H> {
    /// Create a reconciler over a build host
    pub fn new(host: &'a H) -> Self {
        Self { host }
    }

    /// Scan the modules root and reconcile all valid targets.
    ///
    /// A missing root means there is nothing to reconcile: the run is a
    /// logged no-op, not an error, and no stored symbol is touched.
    pub fn reconcile_root(&self, root: &Path) -> Result<ReconcileReport, ScanError> {
        let folders = match list_module_folders(root) {
            Ok(folders) => folders,
            Err(ScanError::RootNotFound(path)) => {
                warn!(root = %path.display(), "modules root not found, nothing to reconcile");
                return Ok(ReconcileReport::empty());
            }
            Err(e) => return Err(e),
        };

        Ok(self.reconcile(&folders))
    }

    /// Reconcile all valid targets against the given module folder names.
    ///
    /// Idempotent: a second run with unchanged folders rewrites nothing
    /// and requests no reload.
    pub fn reconcile(&self, folder_names: &[String]) -> ReconcileReport {
        let desired = derive_desired_set(folder_names);
        let mut targets = Vec::new();
        let mut any_changed = false;

        for target in self.host.valid_targets() {
            if !self.host.is_supported(&target) {
                debug!(%target, "target not supported, skipping");
                targets.push(TargetOutcome::skipped(target, "not supported"));
                continue;
            }

            let current = match self.host.define_symbols(&target) {
                Ok(current) => current,
                Err(e) => {
                    warn!(%target, error = %e, "failed to read define symbols, skipping target");
                    targets.push(TargetOutcome::skipped(target, e.to_string()));
                    continue;
                }
            };

            let outcome = self.reconcile_target(target, &current, &desired);
            any_changed |= outcome.changed();
            targets.push(outcome);
        }

        if any_changed {
            self.host.request_reload();
            info!("define symbols changed, host reload requested");
        }

        let targets_changed = targets.iter().filter(|t| t.changed()).count();
        let targets_skipped = targets.iter().filter(|t| t.skipped.is_some()).count();
        ReconcileReport {
            created_at: Utc::now(),
            desired_symbols: desired.iter().cloned().collect(),
            targets,
            targets_changed,
            targets_skipped,
            reload_requested: any_changed,
        }
    }

    fn reconcile_target(
        &self,
        target: TargetId,
        current: &[String],
        desired: &BTreeSet<String>,
    ) -> TargetOutcome {
        let current_set: HashSet<&str> = current.iter().map(String::as_str).collect();

        // Obsolete managed symbols drop out in place; everything else
        // keeps its stored position.
        let mut removed = Vec::new();
        let mut next: Vec<String> = current
            .iter()
            .filter(|symbol| {
                let obsolete = is_managed(symbol) && !desired.contains(symbol.as_str());
                if obsolete {
                    removed.push(symbol.to_string());
                }
                !obsolete
            })
            .cloned()
            .collect();

        // Adding an already-present symbol is a no-op
        let mut added = Vec::new();
        for symbol in desired {
            if !current_set.contains(symbol.as_str()) {
                next.push(symbol.clone());
                added.push(symbol.clone());
            }
        }

        if added.is_empty() && removed.is_empty() {
            return TargetOutcome::unchanged(target);
        }

        if let Err(e) = self.host.set_define_symbols(&target, &next) {
            warn!(%target, error = %e, "failed to write define symbols, skipping target");
            return TargetOutcome::skipped(target, e.to_string());
        }

        for symbol in &added {
            info!(%target, %symbol, "define symbol added");
        }
        for symbol in &removed {
            info!(%target, %symbol, "obsolete define symbol removed");
        }

        TargetOutcome {
            target,
            added,
            removed,
            skipped: None,
        }
    }
}

/// Derive the desired symbol set from module folder names.
///
/// Folder names that cannot produce a symbol are logged and skipped.
fn derive_desired_set(folder_names: &[String]) -> BTreeSet<String> {
    let mut desired = BTreeSet::new();
    for folder in folder_names {
        match derive_symbol_name(folder) {
            Ok(symbol) => {
                desired.insert(symbol);
            }
            Err(e) => {
                warn!(%folder, error = %e, "cannot derive symbol for folder, skipping");
            }
        }
    }
    desired
}
