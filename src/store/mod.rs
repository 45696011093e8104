//! TOML-backed project settings store
//!
//! Persists each build target's define symbol list as a delimiter-joined
//! string in a project settings file, one `[[target]]` table per target:
//!
//! ```toml
//! schema_version = 1
//!
//! [[target]]
//! name = "standalone-win64"
//! supported = true
//! define_symbols = "CUSTOM_FLAG;USE_MORN"
//! ```
//!
//! The store is the authoritative flag storage, so every successful write
//! is flushed straight back to disk.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::host::{BuildHost, HostError, TargetId};

/// Default flag list delimiter
pub const DEFAULT_DELIMITER: char = ';';

/// Schema version for the project settings file
pub const SCHEMA_VERSION: u32 = 1;

/// Errors loading or persisting project settings
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read project settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse project settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize project settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("duplicate target name: '{0}'")]
    DuplicateTarget(String),

    #[error("target entry has an empty name")]
    EmptyTargetName,

    #[error("project settings not found: {0}")]
    NotFound(PathBuf),
}

/// Project settings file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Schema version for forward compatibility
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Per-target entries
    #[serde(default, rename = "target")]
    pub targets: Vec<TargetEntry>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// One build target's stored configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetEntry {
    /// Unique target name
    pub name: String,

    /// Whether this host can currently produce the target
    #[serde(default = "default_supported")]
    pub supported: bool,

    /// Delimiter-joined define symbol list
    #[serde(default)]
    pub define_symbols: String,
}

fn default_supported() -> bool {
    true
}

impl ProjectSettings {
    /// Parse project settings from a TOML string
    pub fn parse(content: &str) -> Result<Self, StoreError> {
        let settings: ProjectSettings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), StoreError> {
        let mut seen = std::collections::HashSet::new();
        for target in &self.targets {
            if target.name.trim().is_empty() {
                return Err(StoreError::EmptyTargetName);
            }
            if !seen.insert(&target.name) {
                return Err(StoreError::DuplicateTarget(target.name.clone()));
            }
        }
        Ok(())
    }
}

/// Split a stored flag string into a clean symbol list.
///
/// Empty and whitespace-only entries are discarded; no other delimiter
/// assumption leaks past this function.
pub fn split_flags(raw: &str, delimiter: char) -> Vec<String> {
    raw.split(delimiter)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join a symbol list back into a stored flag string
pub fn join_flags(symbols: &[String], delimiter: char) -> String {
    symbols.join(&delimiter.to_string())
}

/// File-backed [`BuildHost`] over a [`ProjectSettings`] document
pub struct ProjectStore {
    path: PathBuf,
    delimiter: char,
    settings: Mutex<ProjectSettings>,
    reload_requests: AtomicU32,
}

impl ProjectStore {
    /// Load a project store from disk with the default delimiter
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        Self::load_with_delimiter(path, DEFAULT_DELIMITER)
    }

    /// Load a project store from disk with an explicit delimiter
    pub fn load_with_delimiter(path: &Path, delimiter: char) -> Result<Self, StoreError> {
        if !path.exists() {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let settings = ProjectSettings::parse(&content)?;
        Ok(Self {
            path: path.to_path_buf(),
            delimiter,
            settings: Mutex::new(settings),
            reload_requests: AtomicU32::new(0),
        })
    }

    /// Path of the backing settings file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of reload requests recorded so far
    pub fn reload_requests(&self) -> u32 {
        self.reload_requests.load(Ordering::Relaxed)
    }

    /// Snapshot of the current settings document
    pub fn settings(&self) -> ProjectSettings {
        self.settings.lock().unwrap().clone()
    }

    fn persist(&self, settings: &ProjectSettings) -> Result<(), StoreError> {
        let content = toml::to_string_pretty(settings)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl BuildHost for ProjectStore {
    fn valid_targets(&self) -> Vec<TargetId> {
        let settings = self.settings.lock().unwrap();
        settings
            .targets
            .iter()
            .map(|t| TargetId::new(t.name.clone()))
            .collect()
    }

    fn is_supported(&self, target: &TargetId) -> bool {
        let settings = self.settings.lock().unwrap();
        settings
            .targets
            .iter()
            .find(|t| t.name == target.as_str())
            .map(|t| t.supported)
            .unwrap_or(false)
    }

    fn define_symbols(&self, target: &TargetId) -> Result<Vec<String>, HostError> {
        let settings = self.settings.lock().unwrap();
        let entry = settings
            .targets
            .iter()
            .find(|t| t.name == target.as_str())
            .ok_or_else(|| HostError::Unsupported(target.clone()))?;
        Ok(split_flags(&entry.define_symbols, self.delimiter))
    }

    fn set_define_symbols(&self, target: &TargetId, symbols: &[String]) -> Result<(), HostError> {
        for symbol in symbols {
            let trimmed = symbol.trim();
            if trimmed.is_empty() || trimmed.contains(self.delimiter) {
                return Err(HostError::InvalidSymbol {
                    target: target.clone(),
                    symbol: symbol.clone(),
                });
            }
        }

        let mut settings = self.settings.lock().unwrap();
        let entry = settings
            .targets
            .iter_mut()
            .find(|t| t.name == target.as_str())
            .ok_or_else(|| HostError::Unsupported(target.clone()))?;
        let previous = std::mem::replace(
            &mut entry.define_symbols,
            join_flags(symbols, self.delimiter),
        );

        if let Err(e) = self.persist(&settings) {
            // Keep the in-memory document aligned with what is on disk
            if let Some(entry) = settings
                .targets
                .iter_mut()
                .find(|t| t.name == target.as_str())
            {
                entry.define_symbols = previous;
            }
            return Err(HostError::WriteFailure {
                target: target.clone(),
                reason: e.to_string(),
            });
        }

        Ok(())
    }

    fn request_reload(&self) {
        self.reload_requests.fetch_add(1, Ordering::Relaxed);
        info!(path = %self.path.display(), "project reload requested");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SAMPLE: &str = r#"
        schema_version = 1

        [[target]]
        name = "standalone-win64"
        define_symbols = "USE_MORN; CUSTOM_FLAG ;;"

        [[target]]
        name = "webgl"
        supported = false
    "#;

    fn write_store(content: &str) -> (tempfile::TempDir, ProjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project_settings.toml");
        fs::write(&path, content).unwrap();
        let store = ProjectStore::load(&path).unwrap();
        (dir, store)
    }

    #[test]
    fn test_parse_basic_settings() {
        let settings = ProjectSettings::parse(SAMPLE).unwrap();
        assert_eq!(settings.schema_version, 1);
        assert_eq!(settings.targets.len(), 2);
        assert!(settings.targets[0].supported);
        assert!(!settings.targets[1].supported);
    }

    #[test]
    fn test_duplicate_target_rejected() {
        let content = r#"
            [[target]]
            name = "same"

            [[target]]
            name = "same"
        "#;
        let result = ProjectSettings::parse(content);
        assert!(matches!(result, Err(StoreError::DuplicateTarget(_))));
    }

    #[test]
    fn test_empty_target_name_rejected() {
        let content = r#"
            [[target]]
            name = "  "
        "#;
        let result = ProjectSettings::parse(content);
        assert!(matches!(result, Err(StoreError::EmptyTargetName)));
    }

    #[test]
    fn test_split_discards_blank_entries() {
        assert_eq!(
            split_flags("USE_MORN; CUSTOM_FLAG ;;", ';'),
            vec!["USE_MORN", "CUSTOM_FLAG"]
        );
        assert!(split_flags("", ';').is_empty());
        assert!(split_flags(" ; ; ", ';').is_empty());
    }

    #[test]
    fn test_read_symbols_through_host() {
        let (_dir, store) = write_store(SAMPLE);
        let symbols = store
            .define_symbols(&TargetId::new("standalone-win64"))
            .unwrap();
        assert_eq!(symbols, vec!["USE_MORN", "CUSTOM_FLAG"]);
    }

    #[test]
    fn test_unknown_target_is_unsupported() {
        let (_dir, store) = write_store(SAMPLE);
        let result = store.define_symbols(&TargetId::new("ghost"));
        assert!(matches!(result, Err(HostError::Unsupported(_))));
        assert!(!store.is_supported(&TargetId::new("ghost")));
    }

    #[test]
    fn test_supported_flag_respected() {
        let (_dir, store) = write_store(SAMPLE);
        assert!(store.is_supported(&TargetId::new("standalone-win64")));
        assert!(!store.is_supported(&TargetId::new("webgl")));
    }

    #[test]
    fn test_write_persists_to_disk() {
        let (_dir, store) = write_store(SAMPLE);
        let target = TargetId::new("standalone-win64");
        store
            .set_define_symbols(&target, &["A".to_string(), "B".to_string()])
            .unwrap();

        let reloaded = ProjectStore::load(store.path()).unwrap();
        assert_eq!(reloaded.define_symbols(&target).unwrap(), vec!["A", "B"]);
    }

    #[test]
    fn test_symbol_with_delimiter_rejected() {
        let (_dir, store) = write_store(SAMPLE);
        let target = TargetId::new("standalone-win64");
        let result = store.set_define_symbols(&target, &["BAD;SYMBOL".to_string()]);
        assert!(matches!(result, Err(HostError::InvalidSymbol { .. })));

        // Stored list untouched
        assert_eq!(
            store.define_symbols(&target).unwrap(),
            vec!["USE_MORN", "CUSTOM_FLAG"]
        );
    }

    #[test]
    fn test_reload_requests_counted() {
        let (_dir, store) = write_store(SAMPLE);
        assert_eq!(store.reload_requests(), 0);
        store.request_reload();
        store.request_reload();
        assert_eq!(store.reload_requests(), 2);
    }

    #[test]
    fn test_missing_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = ProjectStore::load(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }
}
