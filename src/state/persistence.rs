//! Per-root session record: theme, view policy and mouse mode survive restarts.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use vw_base::constants::SESSIONS_DIR;
use vw_mod_tree::ViewPolicy;

use crate::infra::logging::state_dir;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("no per-user state directory available")]
    NoStateDir,
    #[error("writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("encoding session record: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionRecord {
    pub theme_index: usize,
    pub show_hidden: bool,
    pub respect_rules: bool,
    pub nesting: bool,
    pub mouse_mode: bool,
}

impl Default for SessionRecord {
    fn default() -> Self {
        let policy = ViewPolicy::default();
        Self {
            theme_index: 0,
            show_hidden: policy.show_hidden,
            respect_rules: policy.respect_rules,
            nesting: policy.nesting,
            mouse_mode: false,
        }
    }
}

impl SessionRecord {
    pub fn policy(&self) -> ViewPolicy {
        ViewPolicy { show_hidden: self.show_hidden, respect_rules: self.respect_rules, nesting: self.nesting }
    }

    pub fn set_policy(&mut self, policy: ViewPolicy) {
        self.show_hidden = policy.show_hidden;
        self.respect_rules = policy.respect_rules;
        self.nesting = policy.nesting;
    }
}

pub fn record_path(session_id: &str) -> Option<PathBuf> {
    state_dir().map(|d| d.join(SESSIONS_DIR).join(format!("{}.json", session_id)))
}

/// Load the record for `session_id`; defaults if absent or unreadable.
pub fn load(session_id: &str) -> SessionRecord {
    record_path(session_id).map(|p| load_from(&p)).unwrap_or_default()
}

pub fn save(session_id: &str, record: &SessionRecord) -> Result<(), PersistError> {
    let path = record_path(session_id).ok_or(PersistError::NoStateDir)?;
    save_to(&path, record)
}

pub fn load_from(path: &Path) -> SessionRecord {
    let Ok(content) = fs::read_to_string(path) else {
        return SessionRecord::default();
    };
    serde_json::from_str(&content).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "corrupt session record, using defaults");
        SessionRecord::default()
    })
}

/// Write through a temp file so a crash never leaves half a record.
pub fn save_to(path: &Path, record: &SessionRecord) -> Result<(), PersistError> {
    let io_err = |source| PersistError::Io { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(record)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    debug!(path = %path.display(), "session record saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn round_trip_through_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sessions").join("abcd.json");
        let record = SessionRecord { theme_index: 3, nesting: true, mouse_mode: true, ..SessionRecord::default() };
        save_to(&path, &record).unwrap();
        assert_eq!(load_from(&path), record);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn missing_or_corrupt_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("none.json");
        assert_eq!(load_from(&path), SessionRecord::default());
        fs::write(&path, "{not json").unwrap();
        assert_eq!(load_from(&path), SessionRecord::default());
    }

    #[test]
    fn partial_record_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("old.json");
        fs::write(&path, r#"{"theme_index": 2}"#).unwrap();
        let record = load_from(&path);
        assert_eq!(record.theme_index, 2);
        assert!(record.respect_rules);
        assert_eq!(record.policy(), ViewPolicy::default());
    }
}
