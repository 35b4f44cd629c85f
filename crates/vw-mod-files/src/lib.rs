//! Filesystem mutations triggered from the tree: create and delete entries.
//!
//! Every operation reports a typed outcome; none of them overwrite or
//! silently skip. Callers rebuild their view afterwards whatever the result.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

/// Result type alias for mutation operations
pub type MutationResult<T> = Result<T, MutationError>;

#[derive(Error, Debug)]
pub enum MutationError {
    #[error("already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("does not exist: {}", .0.display())]
    NotFound(PathBuf),

    /// Asked to delete a file, found a directory
    #[error("is a directory, not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MutationError {
    fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::AlreadyExists => Self::AlreadyExists(path.to_path_buf()),
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io { action, path: path.to_path_buf(), source },
        }
    }
}

/// What kind of entry an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn noun(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
        }
    }
}

/// A requested filesystem mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Create { path: PathBuf, kind: EntryKind },
    Delete { path: PathBuf, kind: EntryKind },
}

impl Mutation {
    pub fn path(&self) -> &Path {
        match self {
            Self::Create { path, .. } | Self::Delete { path, .. } => path,
        }
    }
}

/// Successful mutation, for user-facing messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Created { path: PathBuf, kind: EntryKind },
    Deleted { path: PathBuf, kind: EntryKind },
}

impl MutationOutcome {
    pub fn describe(&self) -> String {
        let (verb, path, kind) = match self {
            Self::Created { path, kind } => ("Created", path, kind),
            Self::Deleted { path, kind } => ("Deleted", path, kind),
        };
        let name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_else(|| path.display().to_string());
        format!("{} {} {}", verb, kind.noun(), name)
    }
}

/// Run a mutation.
pub fn execute(mutation: &Mutation) -> MutationResult<MutationOutcome> {
    let result = match mutation {
        Mutation::Create { path, kind: EntryKind::File } => create_file(path),
        Mutation::Create { path, kind: EntryKind::Directory } => create_directory(path),
        Mutation::Delete { path, kind: EntryKind::File } => delete_file(path),
        Mutation::Delete { path, kind: EntryKind::Directory } => delete_directory(path),
    };
    let result = result.map(|()| match mutation.clone() {
        Mutation::Create { path, kind } => MutationOutcome::Created { path, kind },
        Mutation::Delete { path, kind } => MutationOutcome::Deleted { path, kind },
    });
    match &result {
        Ok(outcome) => info!(outcome = %outcome.describe(), "mutation applied"),
        Err(e) => info!(path = %mutation.path().display(), error = %e, "mutation failed"),
    }
    result
}

/// Create an empty file. Never truncates an existing entry.
pub fn create_file(path: &Path) -> MutationResult<()> {
    if path.symlink_metadata().is_ok() {
        return Err(MutationError::AlreadyExists(path.to_path_buf()));
    }
    // create_new closes the window between the check above and the create
    OpenOptions::new().write(true).create_new(true).open(path).map_err(|e| MutationError::io("create file", path, e))?;
    debug!(path = %path.display(), "file created");
    Ok(())
}

/// Create a single directory (parent must exist).
pub fn create_directory(path: &Path) -> MutationResult<()> {
    if path.symlink_metadata().is_ok() {
        return Err(MutationError::AlreadyExists(path.to_path_buf()));
    }
    fs::create_dir(path).map_err(|e| MutationError::io("create directory", path, e))?;
    debug!(path = %path.display(), "directory created");
    Ok(())
}

/// Remove a file. Refuses directories.
pub fn delete_file(path: &Path) -> MutationResult<()> {
    let meta = path.symlink_metadata().map_err(|e| MutationError::io("stat", path, e))?;
    if meta.is_dir() {
        return Err(MutationError::NotAFile(path.to_path_buf()));
    }
    fs::remove_file(path).map_err(|e| MutationError::io("delete file", path, e))
}

/// Remove a directory and everything below it.
pub fn delete_directory(path: &Path) -> MutationResult<()> {
    let meta = path.symlink_metadata().map_err(|e| MutationError::io("stat", path, e))?;
    if !meta.is_dir() {
        return Err(MutationError::NotADirectory(path.to_path_buf()));
    }
    fs::remove_dir_all(path).map_err(|e| MutationError::io("delete directory", path, e))
}

/// Number of direct children of a directory (not recursive).
pub fn count_children(path: &Path) -> MutationResult<usize> {
    let entries = fs::read_dir(path).map_err(|e| MutationError::io("read directory", path, e))?;
    Ok(entries.count())
}
