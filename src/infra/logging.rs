use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use vw_base::constants::{APP_DIR, DEFAULT_LOG_FILTER, LOG_ENV, LOG_FILE};

/// Per-user directory for logs and session records.
pub fn state_dir() -> Option<PathBuf> {
    dirs::state_dir().or_else(dirs::cache_dir).or_else(dirs::config_dir).map(|d| d.join(APP_DIR))
}

/// Route `tracing` output to the log file. The terminal belongs to the UI, so
/// when the file can't be opened logging is simply off.
pub fn init() -> Option<PathBuf> {
    let dir = state_dir()?;
    fs::create_dir_all(&dir).ok()?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file))
        .try_init()
        .ok()?;
    Some(path)
}
