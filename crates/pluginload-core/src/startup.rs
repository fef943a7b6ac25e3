use std::sync::Arc;

use crate::{
    paths::PathNormalizer,
    prefs::{KEY_ADDED_PATH, PREF_SECTION, PreferenceError, PreferenceStore},
};

/// Tracks the optional secondary directory loaded at every host startup.
///
/// The persisted value is either a normalized absolute path or the empty
/// string, the sentinel for "unset".
pub struct StartupLoadPathManager {
    store: Arc<dyn PreferenceStore>,
    paths: PathNormalizer,
}

impl StartupLoadPathManager {
    pub fn new(store: Arc<dyn PreferenceStore>, paths: PathNormalizer) -> Self {
        Self { store, paths }
    }

    /// Returns the configured startup directory, if one is set.
    ///
    /// The value is normalized on the way out as well, so a raw path
    /// persisted by an older version still comes back canonical.
    pub fn startup_path(&self) -> Option<String> {
        let value = self.store.read(PREF_SECTION, KEY_ADDED_PATH, "");
        if value.is_empty() {
            None
        } else {
            Some(self.paths.normalize(&value))
        }
    }

    /// Persists a new startup directory, or clears it with `None`.
    pub fn set_startup_path(&self, dir: Option<&str>) -> Result<(), PreferenceError> {
        let value = match dir {
            Some(dir) => self.paths.normalize(dir),
            None => String::new(),
        };
        self.store.write(PREF_SECTION, KEY_ADDED_PATH, &value)
    }
}
