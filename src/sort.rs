//! Alphabetical re-sort of stored define symbol lists
//!
//! Pure reordering: membership is never changed, and targets whose lists
//! are already sorted are not rewritten, so a second run is a no-op.

use serde::Serialize;
use tracing::{debug, warn};

use crate::host::{BuildHost, TargetId};

/// Summary of one sort run
#[derive(Debug, Clone, Serialize)]
pub struct SortReport {
    /// Targets whose stored list was rewritten in sorted order
    pub targets_sorted: Vec<TargetId>,

    /// Count of targets skipped (unsupported or failed)
    pub targets_skipped: usize,
}

impl SortReport {
    /// Whether any target's stored list was rewritten
    pub fn changed(&self) -> bool {
        !self.targets_sorted.is_empty()
    }
}

/// Re-sort every valid target's define symbol list alphabetically
pub fn sort_all<H: BuildHost + ?Sized>(host: &H) -> SortReport {
    let mut targets_sorted = Vec::new();
    let mut targets_skipped = 0;

    for target in host.valid_targets() {
        if !host.is_supported(&target) {
            debug!(%target, "target not supported, skipping");
            targets_skipped += 1;
            continue;
        }

        let current = match host.define_symbols(&target) {
            Ok(current) => current,
            Err(e) => {
                warn!(%target, error = %e, "failed to read define symbols, skipping target");
                targets_skipped += 1;
                continue;
            }
        };

        let mut sorted = current.clone();
        sorted.sort();
        if sorted == current {
            continue;
        }

        match host.set_define_symbols(&target, &sorted) {
            Ok(()) => targets_sorted.push(target),
            Err(e) => {
                warn!(%target, error = %e, "failed to write define symbols, skipping target");
                targets_skipped += 1;
            }
        }
    }

    SortReport {
        targets_sorted,
        targets_skipped,
    }
}
