use std::{
    collections::VecDeque,
    fs,
    io::{self, Write},
    sync::Mutex,
};

use pluginload_host::{FileFilter, HostError, HostOps};
use tracing::{debug, info};

/// Headless host for driving the engine from a terminal.
///
/// Dialog selections come from queued command-line arguments instead of a
/// picker, and yes/no questions pop queued answers (defaulting to no).
/// Script loading and archive installation are stood in for by an
/// existence/readability check; actually executing scripts is the real host
/// application's job.
pub struct CliHost {
    picks: Mutex<VecDeque<String>>,
    confirms: Mutex<VecDeque<bool>>,
}

impl CliHost {
    pub fn new(picks: Vec<String>, confirms: Vec<bool>) -> Self {
        Self {
            picks: Mutex::new(picks.into()),
            confirms: Mutex::new(confirms.into()),
        }
    }

    fn next_pick(&self) -> Option<String> {
        self.picks.lock().ok()?.pop_front()
    }

    fn probe(&self, path: &str) -> Result<(), HostError> {
        fs::File::open(path)?;
        Ok(())
    }
}

impl HostOps for CliHost {
    fn pick_file(&self, prompt: &str, start_dir: &str, filter: &FileFilter) -> Option<String> {
        debug!(prompt, start_dir, pattern = %filter.pattern(), "file selection");
        self.next_pick()
    }

    fn pick_folder(&self, prompt: &str, start_dir: &str) -> Option<String> {
        debug!(prompt, start_dir, "folder selection");
        self.next_pick()
    }

    fn load_script(&self, path: &str) -> Result<(), HostError> {
        self.probe(path)?;
        info!(path, "script accepted");
        Ok(())
    }

    fn install_archive(&self, path: &str) -> Result<(), HostError> {
        self.probe(path)?;
        info!(path, "archive accepted");
        Ok(())
    }

    fn notify_user(&self, message: &str) {
        let mut stdout = io::stdout();
        let _ = writeln!(stdout, "{message}");
    }

    fn confirm(&self, prompt: &str) -> bool {
        let answer = self
            .confirms
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or(false);
        debug!(prompt, answer, "confirmation");
        answer
    }
}
