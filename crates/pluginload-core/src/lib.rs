pub mod errors;
pub mod paths;
pub mod prefs;
pub mod resolver;
pub mod startup;

pub use errors::LoaderError;
pub use paths::{Environment, PathNormalizer, default_prefs_path};
pub use prefs::{
    KEY_ADDED_PATH, KEY_LAST_DIR, MemoryStore, PREF_SECTION, PreferenceError, PreferenceStore,
};
pub use resolver::DirectoryResolver;
pub use startup::StartupLoadPathManager;
