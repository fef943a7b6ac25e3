use thiserror::Error;

/// Failures surfaced to the user by loader operations.
///
/// A dismissed dialog is not an error; operations report that through their
/// outcome type instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoaderError {
    /// The picked path does not carry an accepted extension.
    #[error("not a {expected} file: {path}")]
    InvalidSelection { path: String, expected: &'static str },
    /// A folder operation found nothing eligible to load.
    #[error("no script files found in {dir}")]
    NoMatchingFiles { dir: String },
    /// The delegated host call itself failed.
    #[error("{action} failed: {message}")]
    HostOperationFailed {
        action: &'static str,
        message: String,
    },
}
