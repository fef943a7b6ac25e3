use std::{collections::HashMap, sync::Mutex};

use thiserror::Error;

/// Preference namespace shared by every pluginload key.
pub const PREF_SECTION: &str = "pluginload";
/// Key holding the directory last used by a successful operation.
pub const KEY_LAST_DIR: &str = "last_dir";
/// Key holding the optional startup load path; empty string means unset.
pub const KEY_ADDED_PATH: &str = "added_path";

/// Failure while persisting a preference.
///
/// Recoverable by contract: the operation that triggered the write keeps
/// its result, and callers log and continue.
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// Backing storage rejected the write.
    #[error("failed to persist preference {section}/{key}: {detail}")]
    WriteFailed {
        section: String,
        key: String,
        detail: String,
    },
}

/// Host-provided persistent key-value store for named string preferences.
///
/// Reads never fail: an absent key or unreadable backing store yields the
/// supplied default.
pub trait PreferenceStore: Send + Sync {
    /// Reads one preference, falling back to `default`.
    fn read(&self, section: &str, key: &str, default: &str) -> String;

    /// Writes one preference.
    fn write(&self, section: &str, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// In-memory store for tests and hosts without durable preferences.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<(String, String), String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn read(&self, section: &str, key: &str, default: &str) -> String {
        let values = match self.values.lock() {
            Ok(guard) => guard,
            Err(_) => return default.to_string(),
        };

        values
            .get(&(section.to_string(), key.to_string()))
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn write(&self, section: &str, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut values = self
            .values
            .lock()
            .map_err(|err| PreferenceError::WriteFailed {
                section: section.to_string(),
                key: key.to_string(),
                detail: err.to_string(),
            })?;

        values.insert((section.to_string(), key.to_string()), value.to_string());
        Ok(())
    }
}
