//! # Filesystem Helper
//!
//! Everything that touches disk lives behind the [`FileSystem`] trait.
//! The file tree never calls `std::fs` directly: it emits commands, and the
//! host runs them against whichever helper it was built with (`LocalFs` in
//! the binary, a recording fake in tests).
//!
//! The helper owns its own working directory. The process working directory
//! is never changed, so "current directory" always means the directory the
//! helper listed last.

mod archive;
pub mod clipboard;
pub mod entry;
mod local;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

pub use clipboard::{Clipboard, ClipboardError, SystemClipboard};
pub use entry::{Entry, Listing};
pub use local::LocalFs;

/// Which directory a listing request refers to.
///
/// Targets are resolved by the helper when the request runs, not when it is
/// issued, so a refresh queued behind a mutation sees the directory as it is
/// after that mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirTarget {
    Current,
    Parent,
    Home,
    Path(PathBuf),
}

/// Errors produced by filesystem helper operations.
#[derive(Debug)]
pub enum FsError {
    /// Underlying I/O failure on a specific path.
    Io { path: PathBuf, source: io::Error },
    /// Tried to list something that is not a directory.
    NotADirectory(PathBuf),
    /// Current directory is the filesystem root.
    NoParent(PathBuf),
    /// Home directory could not be determined.
    NoHomeDirectory,
    /// A new entry name was empty, `.`/`..`, or contained a separator.
    InvalidName(String),
    /// Reading or writing a zip archive failed.
    Archive { path: PathBuf, message: String },
}

impl FsError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        FsError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsError::Io { path, source } => write!(f, "{}: {source}", path.display()),
            FsError::NotADirectory(path) => write!(f, "{} is not a directory", path.display()),
            FsError::NoParent(path) => write!(f, "{} has no parent directory", path.display()),
            FsError::NoHomeDirectory => write!(f, "could not determine home directory"),
            FsError::InvalidName(name) => write!(f, "invalid name: {name:?}"),
            FsError::Archive { path, message } => {
                write!(f, "archive error on {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for FsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FsError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Operations the file tree needs from the filesystem.
///
/// All paths passed in are absolute entry paths taken from a [`Listing`];
/// names passed to the create operations are resolved against the current
/// directory.
pub trait FileSystem: Send + Sync {
    /// The directory the last successful listing resolved to.
    fn current_dir(&self) -> PathBuf;

    /// Lists `target` and makes it the current directory.
    /// On failure the current directory is left unchanged.
    fn list_directory(&self, target: &DirTarget, show_hidden: bool) -> Result<Listing, FsError>;

    /// Copies a file or directory next to itself under a timestamped name.
    fn copy(&self, path: &Path) -> Result<PathBuf, FsError>;

    /// Zips a file or directory next to itself under a timestamped name.
    fn zip(&self, path: &Path) -> Result<PathBuf, FsError>;

    /// Extracts an archive into a directory named after its stem.
    fn unzip(&self, path: &Path) -> Result<PathBuf, FsError>;

    fn create_file(&self, name: &str) -> Result<PathBuf, FsError>;

    fn create_directory(&self, name: &str) -> Result<PathBuf, FsError>;

    /// Removes a file, or a directory and everything below it.
    fn delete(&self, path: &Path) -> Result<(), FsError>;
}

/// Rejects names that would escape the current directory.
pub(crate) fn validate_name(name: &str) -> Result<&str, FsError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains('/')
        || trimmed.contains(std::path::MAIN_SEPARATOR)
    {
        return Err(FsError::InvalidName(name.to_string()));
    }
    Ok(trimmed)
}
