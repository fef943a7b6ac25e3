mod ops;
mod scan;

pub use ops::{LoadOutcome, Loader, ScriptOutcome, StartupReport};
