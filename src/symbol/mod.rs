//! Define symbol naming for Morn module folders
//!
//! Converts a module folder name into its canonical define symbol.
//! A lower→upper case transition starts a new word; consecutive uppercase
//! letters stay joined so acronyms survive (`MornUGUI` → `USE_MORN_UGUI`).

use thiserror::Error;

/// Prefix prepended to every derived symbol
pub const SYMBOL_PREFIX: &str = "USE_";

/// Prefix marking symbols owned by reconciliation. Symbols outside this
/// prefix are never removed automatically.
pub const MANAGED_PREFIX: &str = "USE_MORN_";

/// Errors during symbol derivation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SymbolError {
    /// Folder name was empty or whitespace-only
    #[error("cannot derive a define symbol from an empty folder name")]
    EmptyFolderName,
}

/// Derive the canonical define symbol for a module folder name.
///
/// `MornBeat` → `USE_MORN_BEAT`, `MornUGUI` → `USE_MORN_UGUI`,
/// `Morn` → `USE_MORN`.
pub fn derive_symbol_name(folder_name: &str) -> Result<String, SymbolError> {
    let folder_name = folder_name.trim();
    if folder_name.is_empty() {
        return Err(SymbolError::EmptyFolderName);
    }

    let mut segmented = String::with_capacity(folder_name.len() + 4);
    let mut prev: Option<char> = None;
    for c in folder_name.chars() {
        if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase()) {
            segmented.push('_');
        }
        segmented.push(c);
        prev = Some(c);
    }

    Ok(format!("{}{}", SYMBOL_PREFIX, segmented.to_uppercase()))
}

/// Check whether a symbol is owned by reconciliation
pub fn is_managed(symbol: &str) -> bool {
    symbol.starts_with(MANAGED_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_word_boundary() {
        assert_eq!(derive_symbol_name("MornBeat").unwrap(), "USE_MORN_BEAT");
        assert_eq!(
            derive_symbol_name("MornBeatSequencer").unwrap(),
            "USE_MORN_BEAT_SEQUENCER"
        );
    }

    #[test]
    fn test_derive_preserves_acronyms() {
        // Consecutive uppercase is one word
        assert_eq!(derive_symbol_name("MornUGUI").unwrap(), "USE_MORN_UGUI");
        assert_eq!(derive_symbol_name("MornAI").unwrap(), "USE_MORN_AI");
    }

    #[test]
    fn test_derive_single_word() {
        assert_eq!(derive_symbol_name("Morn").unwrap(), "USE_MORN");
    }

    #[test]
    fn test_derive_trims_input() {
        assert_eq!(derive_symbol_name("  MornBeat  ").unwrap(), "USE_MORN_BEAT");
    }

    #[test]
    fn test_derive_empty_rejected() {
        assert_eq!(derive_symbol_name(""), Err(SymbolError::EmptyFolderName));
        assert_eq!(derive_symbol_name("   "), Err(SymbolError::EmptyFolderName));
    }

    #[test]
    fn test_derive_is_deterministic() {
        let a = derive_symbol_name("MornSoundVolume").unwrap();
        let b = derive_symbol_name("MornSoundVolume").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, "USE_MORN_SOUND_VOLUME");
    }

    #[test]
    fn test_is_managed() {
        assert!(is_managed("USE_MORN_BEAT"));
        assert!(!is_managed("USE_OTHER"));
        assert!(!is_managed("CUSTOM_FLAG"));
    }
}
