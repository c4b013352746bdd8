//! File logging. The terminal belongs to the UI, so log records go to a file.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use env_logger::{Env, Target};

/// Environment variable holding the log filter, e.g. `NIMBUS_LOG=debug`.
pub const LOG_ENV: &str = "NIMBUS_LOG";

/// Default log file location.
pub fn default_log_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "nimbus").map(|dirs| dirs.data_dir().join("nimbus.log"))
}

/// Install the global logger writing to `path`, or to the default location.
/// Returns the file in use; logging stays disabled when none can be opened.
pub fn init(path: Option<&Path>) -> Option<PathBuf> {
    let path = path.map(Path::to_path_buf).or_else(default_log_path)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;

    env_logger::Builder::from_env(Env::default().filter_or(LOG_ENV, "info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .ok()?;
    Some(path)
}
