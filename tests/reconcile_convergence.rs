//! Reconciliation convergence tests
//!
//! Idempotence, managed-prefix removal scope, per-target failure
//! isolation, and reload batching over the mock host.

use morn_define_lane::mock::{FailureConfig, HostOp, MockHost};
use morn_define_lane::{BuildHost, Reconciler, TargetId};

fn folders(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn sorted_symbols(host: &MockHost, target: &TargetId) -> Vec<String> {
    let mut symbols = host.symbols_for(target);
    symbols.sort();
    symbols
}

// =============================================================================
// Idempotent convergence
// =============================================================================

#[test]
fn test_double_reconcile_converges_and_stops_writing() {
    let host = MockHost::with_targets(&["standalone", "android", "webgl"]);
    host.seed_symbols(&TargetId::new("standalone"), &["USE_MORN_OLD", "CUSTOM_FLAG"]);
    let reconciler = Reconciler::new(&host);

    let first = reconciler.reconcile(&folders(&["MornBeat", "MornUGUI"]));
    assert!(first.changed());

    let after_first: Vec<Vec<String>> = host
        .valid_targets()
        .iter()
        .map(|t| sorted_symbols(&host, t))
        .collect();
    let writes = host.write_count();
    let reloads = host.reload_count();

    let second = reconciler.reconcile(&folders(&["MornBeat", "MornUGUI"]));
    assert!(!second.changed());
    assert!(!second.reload_requested);

    let after_second: Vec<Vec<String>> = host
        .valid_targets()
        .iter()
        .map(|t| sorted_symbols(&host, t))
        .collect();

    assert_eq!(after_first, after_second);
    assert_eq!(host.write_count(), writes, "second run must not write");
    assert_eq!(host.reload_count(), reloads, "second run must not reload");
}

// =============================================================================
// Removal scope: managed prefix only
// =============================================================================

#[test]
fn test_manual_symbols_survive_any_reconcile() {
    let host = MockHost::with_targets(&["standalone"]);
    let target = TargetId::new("standalone");
    host.seed_symbols(&target, &["CUSTOM_FLAG"]);
    let reconciler = Reconciler::new(&host);

    reconciler.reconcile(&folders(&["MornBeat"]));
    reconciler.reconcile(&folders(&[]));
    reconciler.reconcile(&folders(&["MornAudio", "MornBeat"]));

    assert!(host
        .symbols_for(&target)
        .contains(&"CUSTOM_FLAG".to_string()));
}

#[test]
fn test_obsolete_managed_symbol_removed_custom_kept() {
    let host = MockHost::with_targets(&["standalone"]);
    let target = TargetId::new("standalone");
    host.seed_symbols(&target, &["USE_MORN_OLD", "CUSTOM_FLAG", "USE_MORN_BEAT"]);

    Reconciler::new(&host).reconcile(&folders(&["MornBeat"]));

    let symbols = host.symbols_for(&target);
    assert!(!symbols.contains(&"USE_MORN_OLD".to_string()));
    assert!(symbols.contains(&"CUSTOM_FLAG".to_string()));
    assert!(symbols.contains(&"USE_MORN_BEAT".to_string()));
}

#[test]
fn test_unprefixed_use_symbols_not_removed() {
    // USE_ without the full managed prefix is outside reconciliation
    let host = MockHost::with_targets(&["standalone"]);
    let target = TargetId::new("standalone");
    host.seed_symbols(&target, &["USE_OTHER_TOOL"]);

    Reconciler::new(&host).reconcile(&folders(&[]));

    assert!(host
        .symbols_for(&target)
        .contains(&"USE_OTHER_TOOL".to_string()));
}

// =============================================================================
// Per-target isolation
// =============================================================================

#[test]
fn test_unsupported_target_skipped_silently() {
    let host = MockHost::with_targets(&["standalone", "legacy"]);
    let legacy = TargetId::new("legacy");
    host.set_supported(&legacy, false);

    let report = Reconciler::new(&host).reconcile(&folders(&["MornBeat"]));

    assert_eq!(report.targets_skipped, 1);
    assert!(host.symbols_for(&legacy).is_empty());
    assert!(host
        .symbols_for(&TargetId::new("standalone"))
        .contains(&"USE_MORN_BEAT".to_string()));
}

#[test]
fn test_read_failure_does_not_abort_remaining_targets() {
    let host = MockHost::with_targets(&["a", "b", "c"]);
    host.inject_failure(
        HostOp::ReadSymbols,
        Some(TargetId::new("b")),
        FailureConfig::error("simulated read failure"),
    );

    let report = Reconciler::new(&host).reconcile(&folders(&["MornBeat"]));

    assert_eq!(report.targets_skipped, 1);
    assert!(host
        .symbols_for(&TargetId::new("a"))
        .contains(&"USE_MORN_BEAT".to_string()));
    assert!(host
        .symbols_for(&TargetId::new("c"))
        .contains(&"USE_MORN_BEAT".to_string()));
}

#[test]
fn test_write_failure_still_reloads_for_successes() {
    let host = MockHost::with_targets(&["a", "b", "c"]);
    host.fail_writes_for(&TargetId::new("b"), "simulated write failure");

    let report = Reconciler::new(&host).reconcile(&folders(&["MornBeat"]));

    assert_eq!(report.targets_changed, 2);
    assert_eq!(report.targets_skipped, 1);
    assert_eq!(host.reload_count(), 1, "successes still batch one reload");
}

// =============================================================================
// Reload batching
// =============================================================================

#[test]
fn test_reload_fires_once_for_many_targets() {
    let host = MockHost::with_targets(&["a", "b", "c", "d", "e"]);
    Reconciler::new(&host).reconcile(&folders(&["MornBeat", "MornAudio", "MornUGUI"]));
    assert_eq!(host.reload_count(), 1);
}

#[test]
fn test_no_reload_when_nothing_changes() {
    let host = MockHost::with_targets(&["a"]);
    Reconciler::new(&host).reconcile(&folders(&[]));
    assert_eq!(host.reload_count(), 0);
}
