mod json_store;

use thiserror::Error;

pub use json_store::JsonPreferenceStore;

/// File-type filter presented by host file dialogs and used to validate
/// the user's selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    /// Human-readable description shown in dialogs and error messages.
    pub description: &'static str,
    /// Accepted extensions, lowercase, without the leading dot.
    pub extensions: &'static [&'static str],
}

/// Script files loadable by the host runtime.
pub const SCRIPT_FILES: FileFilter = FileFilter {
    description: "Ruby script (RB)",
    extensions: &["rb"],
};

/// Packaged extension archives consumed by the host installer.
pub const ARCHIVE_FILES: FileFilter = FileFilter {
    description: "extension archive (RBZ or ZIP)",
    extensions: &["rbz", "zip"],
};

impl FileFilter {
    /// True when the path's file name carries an accepted extension,
    /// ignoring case. A bare dotfile such as `.rb` has no extension.
    pub fn matches(&self, path: &str) -> bool {
        let name = path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(path)
            .to_ascii_lowercase();

        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => self.extensions.contains(&ext),
            _ => false,
        }
    }

    /// Dialog pattern string, e.g. `*.rbz;*.zip`.
    pub fn pattern(&self) -> String {
        self.extensions
            .iter()
            .map(|ext| format!("*.{ext}"))
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// Errors reported by host-delegated operations.
#[derive(Debug, Error)]
pub enum HostError {
    /// Underlying I/O failure while servicing the request.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The host's script runtime rejected or failed to run the script.
    #[error("script error: {0}")]
    Script(String),
    /// The host's archive installer rejected the archive.
    #[error("install error: {0}")]
    Install(String),
    /// The host cannot perform this operation.
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

/// Host abstraction for dialogs, script loading, and archive installation.
///
/// Implemented by the real host application. Dialogs are modal and block
/// until the user responds; `None` from a picker means the dialog was
/// dismissed, which is not an error.
pub trait HostOps: Send + Sync {
    /// Presents a file dialog opening in `start_dir`.
    fn pick_file(&self, prompt: &str, start_dir: &str, filter: &FileFilter) -> Option<String>;

    /// Presents a folder dialog opening in `start_dir`.
    fn pick_folder(&self, prompt: &str, start_dir: &str) -> Option<String>;

    /// Loads one script file into the host's runtime.
    fn load_script(&self, path: &str) -> Result<(), HostError>;

    /// Hands a packaged extension archive to the host installer.
    fn install_archive(&self, path: &str) -> Result<(), HostError>;

    /// Shows a blocking acknowledgment dialog.
    fn notify_user(&self, message: &str);

    /// Asks a blocking yes/no question.
    fn confirm(&self, prompt: &str) -> bool;
}
