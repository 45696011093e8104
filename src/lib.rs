//! Morn Define Lane - define symbol reconciliation for build targets
//!
//! This crate keeps a set of named define symbols consistent across every
//! build target configuration a host declares. Symbols are derived from
//! the module folders on disk, diffed against each target's stored flag
//! list, and converged with minimal edits; a snapshot-based editor session
//! supports manual per-target curation with deferred commit.

pub mod config;
pub mod editor;
pub mod host;
pub mod mock;
pub mod reconcile;
pub mod scan;
pub mod sort;
pub mod store;
pub mod symbol;

pub use config::LaneConfig;
pub use editor::{CommitReport, EditorError, SymbolMatrixEditor};
pub use host::{BuildHost, HostError, TargetId};
pub use mock::MockHost;
pub use reconcile::{ReconcileReport, Reconciler};
pub use sort::{sort_all, SortReport};
pub use store::ProjectStore;
pub use symbol::{derive_symbol_name, MANAGED_PREFIX, SYMBOL_PREFIX};
