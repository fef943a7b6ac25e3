use std::sync::Arc;

use crate::{
    paths::{Environment, PathNormalizer},
    prefs::{KEY_LAST_DIR, PREF_SECTION, PreferenceError, PreferenceStore},
};

/// Supplies the directory a file dialog should open in and remembers the
/// directory of each successful operation.
pub struct DirectoryResolver {
    store: Arc<dyn PreferenceStore>,
    paths: PathNormalizer,
    env: Environment,
}

impl DirectoryResolver {
    pub fn new(store: Arc<dyn PreferenceStore>, paths: PathNormalizer, env: Environment) -> Self {
        Self { store, paths, env }
    }

    /// Best-guess starting directory for the next dialog.
    ///
    /// Fallback chain: last-used directory, then the user's home, then the
    /// install directory. Pure read; the result is never checked for
    /// existence, the dialog layer tolerates a stale directory.
    pub fn resolve_default_directory(&self) -> String {
        let last = self.store.read(PREF_SECTION, KEY_LAST_DIR, "");
        if !last.is_empty() {
            return self.paths.normalize(&last);
        }

        if let Some(home) = &self.env.home {
            return self.paths.normalize(home);
        }

        self.paths.normalize(&self.env.install_dir)
    }

    /// Persists the directory used by a confirmed-successful operation.
    ///
    /// The only write path for `last_dir`. A write failure must not fail
    /// the operation being recorded.
    pub fn record_directory(&self, dir: &str) -> Result<(), PreferenceError> {
        self.store
            .write(PREF_SECTION, KEY_LAST_DIR, &self.paths.normalize(dir))
    }
}
