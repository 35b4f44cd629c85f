//! Change metadata and repository facts from the `git` CLI.
//!
//! Nothing here fails: a missing binary, a directory outside any repository
//! or a non-zero exit all yield empty results.

pub mod accounts;

use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, warn};

use vw_base::changes::add_magnitude;
use vw_base::{ChangeMap, NEW_FILE_MAGNITUDE};

pub use accounts::{AccountSource, GhCli};

/// Provider of per-file change magnitudes for the watch root.
pub trait ChangeSource: Send + Sync {
    fn fetch_all(&self) -> ChangeMap;
}

/// `git` run inside the watch root. Paths come back relative to that root.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Stdout of a successful git invocation, `None` otherwise.
    fn run(&self, args: &[&str]) -> Option<String> {
        match Command::new("git").args(args).current_dir(&self.root).output() {
            Ok(output) if output.status.success() => Some(String::from_utf8_lossy(&output.stdout).to_string()),
            Ok(output) => {
                debug!(?args, code = ?output.status.code(), "git exited unsuccessfully");
                None
            }
            Err(e) => {
                warn!(?args, error = %e, "git could not be started");
                None
            }
        }
    }

    pub fn is_repo(&self) -> bool {
        self.run(&["rev-parse", "--git-dir"]).is_some()
    }

    /// Current branch, `detached:<sha>` on a detached HEAD, `None` outside a repo.
    pub fn branch(&self) -> Option<String> {
        let branch = self.run(&["branch", "--show-current"])?.trim().to_string();
        if !branch.is_empty() {
            return Some(branch);
        }
        let sha = self.run(&["rev-parse", "--short", "HEAD"])?;
        Some(format!("detached:{}", sha.trim()))
    }
}

impl ChangeSource for GitCli {
    /// Unstaged and staged added-line counts summed per path; untracked files
    /// get the sentinel without being read.
    fn fetch_all(&self) -> ChangeMap {
        let mut changes = ChangeMap::new();
        if let Some(out) = self.run(&["diff", "--numstat", "--relative"]) {
            parse_numstat(&out, &mut changes);
        }
        if let Some(out) = self.run(&["diff", "--cached", "--numstat", "--relative"]) {
            parse_numstat(&out, &mut changes);
        }
        if let Some(out) = self.run(&["ls-files", "--others", "--exclude-standard"]) {
            parse_untracked(&out, &mut changes);
        }
        debug!(root = %self.root.display(), files = changes.len(), "change metadata fetched");
        changes
    }
}

/// Add `git diff --numstat` output to `changes`. Binary files (`-`) count as 0.
pub fn parse_numstat(output: &str, changes: &mut ChangeMap) {
    for line in output.lines() {
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() >= 3 {
            let added = parts[0].parse::<i32>().unwrap_or(0);
            add_magnitude(changes, parts[2], added);
        }
    }
}

/// Mark every path listed by `git ls-files --others` as new.
pub fn parse_untracked(output: &str, changes: &mut ChangeMap) {
    for line in output.lines() {
        let path = line.trim();
        if !path.is_empty() {
            changes.insert(path.to_string(), NEW_FILE_MAGNITUDE);
        }
    }
}
