use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use pluginload_core::{PreferenceError, PreferenceStore};

type Sections = BTreeMap<String, BTreeMap<String, String>>;

/// [`PreferenceStore`] backed by one pretty-printed JSON file of
/// section → key → value.
///
/// Reads parse the file fresh on every call; a missing or corrupt file
/// behaves like an empty store. Writes do a whole-file read-modify-rewrite,
/// creating parent directories as needed.
#[derive(Debug, Clone)]
pub struct JsonPreferenceStore {
    path: PathBuf,
}

impl JsonPreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Sections {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Sections::new(),
        };
        serde_json::from_slice(&bytes).unwrap_or_default()
    }

    fn write_failed(&self, section: &str, key: &str, detail: impl ToString) -> PreferenceError {
        PreferenceError::WriteFailed {
            section: section.to_string(),
            key: key.to_string(),
            detail: detail.to_string(),
        }
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn read(&self, section: &str, key: &str, default: &str) -> String {
        self.load()
            .get(section)
            .and_then(|entries| entries.get(key))
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn write(&self, section: &str, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut sections = self.load();
        sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());

        let json = serde_json::to_vec_pretty(&sections)
            .map_err(|err| self.write_failed(section, key, err))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|err| self.write_failed(section, key, err))?;
        }

        fs::write(&self.path, json).map_err(|err| self.write_failed(section, key, err))
    }
}
