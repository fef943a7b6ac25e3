mod host;

use std::{
    env, io,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use clap::{Parser, Subcommand};
use host::CliHost;
use pluginload_core::{Environment, LoaderError, default_prefs_path};
use pluginload_engine::{LoadOutcome, Loader};
use pluginload_host::JsonPreferenceStore;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(name = "pluginload", about = "On-demand script loading and extension installation")]
struct Cli {
    /// Preference file (defaults to $PLUGINLOAD_PREFS, then ~/.pluginload/prefs.json).
    #[arg(long)]
    prefs: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the directory a file dialog would open in.
    Resolve,
    /// Load one script file.
    Load { file: PathBuf },
    /// Load every script directly inside a folder.
    LoadDir { dir: PathBuf },
    /// Install a packaged extension archive (RBZ or ZIP).
    Install { archive: PathBuf },
    /// Inspect or change the startup load path.
    Startup {
        #[command(subcommand)]
        command: StartupCommand,
    },
}

#[derive(Debug, Subcommand)]
enum StartupCommand {
    /// Show the configured startup load path.
    Show,
    /// Set the startup load path to a folder.
    Set { dir: PathBuf },
    /// Clear the startup load path.
    Clear,
    /// Load every script in the startup load path.
    Run {
        /// Emit the per-file report as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("pluginload error: {err}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let store = Arc::new(JsonPreferenceStore::new(
        cli.prefs.unwrap_or_else(default_prefs_path),
    ));
    let env = Environment::from_env(install_dir());

    match cli.command {
        Command::Resolve => {
            let loader = Loader::new(silent_host(), store, env);
            println!("{}", loader.default_directory());
        }
        Command::Load { file } => {
            let host = Arc::new(CliHost::new(vec![path_arg(&file)?], Vec::new()));
            let loader = Loader::new(host, store, env);
            print_outcome(loader.load_script_file()?);
        }
        Command::LoadDir { dir } => {
            let host = Arc::new(CliHost::new(vec![path_arg(&dir)?], Vec::new()));
            let loader = Loader::new(host, store, env);
            print_outcome(loader.load_script_folder()?);
        }
        Command::Install { archive } => {
            let host = Arc::new(CliHost::new(vec![path_arg(&archive)?], Vec::new()));
            let loader = Loader::new(host, store, env);
            print_outcome(loader.install_archive()?);
        }
        Command::Startup { command } => run_startup(command, store, env)?,
    }

    Ok(())
}

fn run_startup(
    command: StartupCommand,
    store: Arc<JsonPreferenceStore>,
    env: Environment,
) -> Result<(), CliError> {
    match command {
        StartupCommand::Show => {
            let loader = Loader::new(silent_host(), store, env);
            match loader.startup().startup_path() {
                Some(dir) => println!("{dir}"),
                None => println!("(unset)"),
            }
        }
        StartupCommand::Set { dir } => {
            // When a path is already set, the interactive flow asks first
            // whether to clear it, then whether to replace it.
            let host = Arc::new(CliHost::new(vec![path_arg(&dir)?], vec![false, true]));
            let loader = Loader::new(host, store, env);
            match loader.configure_startup_path() {
                Some(dir) => println!("startup load path set to {dir}"),
                None => println!("startup load path unchanged"),
            }
        }
        StartupCommand::Clear => {
            let host = Arc::new(CliHost::new(Vec::new(), vec![true]));
            let loader = Loader::new(host, store, env);
            match loader.configure_startup_path() {
                Some(dir) => println!("startup load path is {dir}"),
                None => println!("startup load path cleared"),
            }
        }
        StartupCommand::Run { json } => {
            let loader = Loader::new(silent_host(), store, env);
            let report = loader.load_startup_scripts();
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                match &report.dir {
                    Some(dir) => println!("startup load path: {dir}"),
                    None => println!("no startup load path set"),
                }
                for script in &report.scripts {
                    match &script.error {
                        None => println!("loaded {}", script.path),
                        Some(message) => println!("failed {}: {message}", script.path),
                    }
                }
            }
        }
    }

    Ok(())
}

/// Host with nothing queued, for commands that never open a dialog.
fn silent_host() -> Arc<CliHost> {
    Arc::new(CliHost::new(Vec::new(), Vec::new()))
}

/// Anchors relative command-line paths at the invocation directory before
/// they reach the engine, whose own base is the install directory.
fn path_arg(path: &Path) -> Result<String, io::Error> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()?.join(path)
    };
    Ok(absolute.to_string_lossy().into_owned())
}

/// Directory holding the running binary, the deterministic last-resort
/// starting point for dialogs.
fn install_dir() -> String {
    env::current_exe()
        .ok()
        .and_then(|exe| {
            exe.parent()
                .map(|parent| parent.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| ".".to_string())
}

fn print_outcome(outcome: LoadOutcome) {
    match outcome {
        LoadOutcome::Loaded { dir, files } => {
            for file in &files {
                println!("loaded {file}");
            }
            println!("remembered {dir}");
        }
        LoadOutcome::Installed { path } => println!("installed {path}"),
        LoadOutcome::Cancelled => println!("cancelled"),
    }
}
