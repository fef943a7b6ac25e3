use std::{path::Path, sync::Arc};

use pluginload_core::{
    DirectoryResolver, Environment, LoaderError, PathNormalizer, PreferenceStore,
    StartupLoadPathManager,
};
use pluginload_host::{ARCHIVE_FILES, FileFilter, HostError, HostOps, SCRIPT_FILES};
use serde::Serialize;
use tracing::{info, warn};

use crate::scan::list_scripts;

const PROMPT_SCRIPT: &str = "Select a Ruby script file (with RB extension) to load it";
const PROMPT_FOLDER: &str = "Select a folder with Ruby scripts - all will be loaded from it";
const PROMPT_ARCHIVE: &str = "Select an extension installer file (with RBZ or ZIP extension)";
const PROMPT_STARTUP: &str = "Select a folder to load scripts from at every startup";

/// Result of one user-driven load or install operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Scripts were loaded into the host runtime.
    Loaded { dir: String, files: Vec<String> },
    /// An archive was handed to the host installer.
    Installed { path: String },
    /// The user dismissed the dialog; nothing changed.
    Cancelled,
}

/// Per-file result of a startup loading pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptOutcome {
    pub path: String,
    /// `None` when the script loaded; otherwise the host's failure message.
    pub error: Option<String>,
}

/// Summary of one startup loading pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StartupReport {
    /// The configured startup directory, if any.
    pub dir: Option<String>,
    pub scripts: Vec<ScriptOutcome>,
}

/// Drives the user-facing operations against an injected host.
///
/// Every operation follows the same shape: resolve the starting directory,
/// present a modal dialog, validate the selection, delegate to the host,
/// and record the directory only after the host call succeeded. Errors are
/// surfaced to the user through [`HostOps::notify_user`] and also returned
/// to the caller.
pub struct Loader {
    host: Arc<dyn HostOps>,
    paths: PathNormalizer,
    resolver: DirectoryResolver,
    startup: StartupLoadPathManager,
}

impl Loader {
    pub fn new(host: Arc<dyn HostOps>, store: Arc<dyn PreferenceStore>, env: Environment) -> Self {
        let paths = PathNormalizer::new(&env.install_dir);
        let resolver = DirectoryResolver::new(store.clone(), paths.clone(), env);
        let startup = StartupLoadPathManager::new(store, paths.clone());

        Self {
            host,
            paths,
            resolver,
            startup,
        }
    }

    /// Directory the next dialog will open in.
    pub fn default_directory(&self) -> String {
        self.resolver.resolve_default_directory()
    }

    /// Access to the startup load path state.
    pub fn startup(&self) -> &StartupLoadPathManager {
        &self.startup
    }

    /// Prompts for one script file and loads it into the host runtime.
    pub fn load_script_file(&self) -> Result<LoadOutcome, LoaderError> {
        let start = self.resolver.resolve_default_directory();
        let Some(picked) = self.host.pick_file(PROMPT_SCRIPT, &start, &SCRIPT_FILES) else {
            return Ok(LoadOutcome::Cancelled);
        };

        let path = self.paths.normalize(&picked);
        self.check_selection(&path, &SCRIPT_FILES)?;

        if let Err(err) = self.host.load_script(&path) {
            return Err(self.report(host_failure("script load", &path, err)));
        }

        let dir = parent_dir(&path).to_string();
        self.remember_dir(&dir);
        info!(path = %path, "loaded script");
        self.host.notify_user(&format!(
            "Loaded script:\n{path}\n\nIt stays available until the host restarts."
        ));

        Ok(LoadOutcome::Loaded {
            dir,
            files: vec![path],
        })
    }

    /// Prompts for a folder and loads every script directly inside it.
    ///
    /// All-or-nothing: the first failing script aborts the operation and
    /// nothing is recorded.
    pub fn load_script_folder(&self) -> Result<LoadOutcome, LoaderError> {
        let start = self.resolver.resolve_default_directory();
        let Some(picked) = self.host.pick_folder(PROMPT_FOLDER, &start) else {
            return Ok(LoadOutcome::Cancelled);
        };

        let dir = self.paths.normalize(&picked);
        let files = match list_scripts(Path::new(&dir)) {
            Ok(files) => files,
            Err(err) => return Err(self.report(host_failure("folder scan", &dir, err.into()))),
        };

        if files.is_empty() {
            return Err(self.report(LoaderError::NoMatchingFiles { dir }));
        }

        for file in &files {
            if let Err(err) = self.host.load_script(file) {
                return Err(self.report(host_failure("script load", file, err)));
            }
        }

        self.remember_dir(&dir);
        info!(dir = %dir, count = files.len(), "loaded scripts from folder");
        self.host.notify_user(&format!(
            "Loaded these scripts:\n{}\n\nThey stay available until the host restarts.",
            files.join("\n")
        ));

        Ok(LoadOutcome::Loaded { dir, files })
    }

    /// Prompts for an archive and hands it to the host installer.
    ///
    /// The directory is recorded only after the installer reported success;
    /// the installer shows its own feedback dialog, so none is added here.
    pub fn install_archive(&self) -> Result<LoadOutcome, LoaderError> {
        let start = self.resolver.resolve_default_directory();
        let Some(picked) = self.host.pick_file(PROMPT_ARCHIVE, &start, &ARCHIVE_FILES) else {
            return Ok(LoadOutcome::Cancelled);
        };

        let path = self.paths.normalize(&picked);
        self.check_selection(&path, &ARCHIVE_FILES)?;

        if let Err(err) = self.host.install_archive(&path) {
            return Err(self.report(host_failure("archive install", &path, err)));
        }

        self.remember_dir(parent_dir(&path));
        info!(path = %path, "installed archive");

        Ok(LoadOutcome::Installed { path })
    }

    /// Loads every script in the startup load path, best-effort per file.
    ///
    /// One failing script never blocks the rest. Never fails itself; the
    /// report carries per-file results. Intended to run once at host
    /// startup.
    pub fn load_startup_scripts(&self) -> StartupReport {
        let Some(dir) = self.startup.startup_path() else {
            return StartupReport::default();
        };

        let files = match list_scripts(Path::new(&dir)) {
            Ok(files) => files,
            Err(err) => {
                warn!(dir = %dir, error = %err, "could not scan startup load path");
                return StartupReport {
                    dir: Some(dir),
                    scripts: Vec::new(),
                };
            }
        };

        let mut scripts = Vec::new();
        for file in files {
            match self.host.load_script(&file) {
                Ok(()) => {
                    info!(path = %file, "startup script loaded");
                    scripts.push(ScriptOutcome {
                        path: file,
                        error: None,
                    });
                }
                Err(err) => {
                    warn!(path = %file, error = %err, "startup script failed");
                    scripts.push(ScriptOutcome {
                        path: file,
                        error: Some(err.to_string()),
                    });
                }
            }
        }

        StartupReport {
            dir: Some(dir),
            scripts,
        }
    }

    /// Walks the user through setting, replacing, or clearing the startup
    /// load path. Declining every prompt leaves the stored state untouched.
    /// Returns the state after the interaction.
    pub fn configure_startup_path(&self) -> Option<String> {
        match self.startup.startup_path() {
            None => self.prompt_startup_dir(),
            Some(current) => {
                if self.host.confirm(&format!(
                    "A startup load path is set:\n{current}\n\nClear it?"
                )) {
                    self.set_startup(None);
                    None
                } else if self.host.confirm("Choose a different startup folder?") {
                    // Dismissing the picker keeps the current path.
                    self.prompt_startup_dir().or(Some(current))
                } else {
                    Some(current)
                }
            }
        }
    }

    fn prompt_startup_dir(&self) -> Option<String> {
        let start = self.resolver.resolve_default_directory();
        let picked = self.host.pick_folder(PROMPT_STARTUP, &start)?;
        let dir = self.paths.normalize(&picked);
        self.set_startup(Some(&dir));
        Some(dir)
    }

    fn set_startup(&self, dir: Option<&str>) {
        if let Err(err) = self.startup.set_startup_path(dir) {
            warn!(error = %err, "could not persist startup load path");
            self.host
                .notify_user(&format!("Could not save the startup load path: {err}"));
        }
    }

    fn check_selection(&self, path: &str, filter: &FileFilter) -> Result<(), LoaderError> {
        if filter.matches(path) {
            return Ok(());
        }
        Err(self.report(LoaderError::InvalidSelection {
            path: path.to_string(),
            expected: filter.description,
        }))
    }

    /// A failed preference write must not undo the operation it records.
    fn remember_dir(&self, dir: &str) {
        if let Err(err) = self.resolver.record_directory(dir) {
            warn!(error = %err, dir = %dir, "could not persist last-used directory");
        }
    }

    fn report(&self, err: LoaderError) -> LoaderError {
        warn!(error = %err, "operation failed");
        self.host.notify_user(&err.to_string());
        err
    }
}

fn host_failure(action: &'static str, path: &str, err: HostError) -> LoaderError {
    LoaderError::HostOperationFailed {
        action,
        message: format!("{path}: {err}"),
    }
}

/// Lexical parent of a normalized path.
fn parent_dir(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some(("", _)) => "/",
        Some((dir, _)) => dir,
        None => path,
    }
}
