//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::core::state::{FileTree, DEFAULT_STATUS_LIFETIME};
use crate::fs::{
    Clipboard, ClipboardError, DirTarget, Entry, FileSystem, FsError, Listing,
};

/// A file entry under `/work` with no timestamp and zero size.
pub fn entry(name: &str, is_dir: bool) -> Entry {
    Entry {
        name: name.to_string(),
        path: Path::new("/work").join(name),
        is_dir,
        size: 0,
        modified: None,
        permissions: if is_dir { "drwxr-xr-x" } else { "-rw-r--r--" }.to_string(),
    }
}

/// A listing of plain files in `dir`.
pub fn listing(dir: &str, names: &[&str]) -> Listing {
    Listing {
        dir: PathBuf::from(dir),
        entries: names
            .iter()
            .map(|name| Entry {
                path: Path::new(dir).join(name),
                ..entry(name, false)
            })
            .collect(),
    }
}

pub fn test_tree() -> FileTree {
    FileTree::new(false, DEFAULT_STATUS_LIFETIME)
}

struct FakeState {
    dir: PathBuf,
    entries: Vec<Entry>,
    calls: Vec<String>,
    fail_next: Option<String>,
}

/// In-memory `FileSystem` that records every call.
pub struct FakeFs {
    state: Mutex<FakeState>,
}

impl FakeFs {
    pub fn with_entries(dir: &str, names: &[&str]) -> Self {
        Self {
            state: Mutex::new(FakeState {
                dir: PathBuf::from(dir),
                entries: listing(dir, names).entries,
                calls: Vec::new(),
                fail_next: None,
            }),
        }
    }

    /// Makes the next call fail with `message`.
    pub fn fail_next(&self, message: &str) {
        self.state.lock().unwrap().fail_next = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, call: String) -> Result<(), FsError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match state.fail_next.take() {
            Some(message) => Err(FsError::Io {
                path: state.dir.clone(),
                source: io::Error::other(message),
            }),
            None => Ok(()),
        }
    }
}

impl FileSystem for FakeFs {
    fn current_dir(&self) -> PathBuf {
        self.state.lock().unwrap().dir.clone()
    }

    fn list_directory(&self, target: &DirTarget, show_hidden: bool) -> Result<Listing, FsError> {
        self.record(format!("list {target:?} hidden={show_hidden}"))?;
        let mut state = self.state.lock().unwrap();
        if let DirTarget::Path(path) = target {
            state.dir = path.clone();
        }
        Ok(Listing {
            dir: state.dir.clone(),
            entries: state
                .entries
                .iter()
                .filter(|e| show_hidden || !e.is_hidden())
                .cloned()
                .collect(),
        })
    }

    fn copy(&self, path: &Path) -> Result<PathBuf, FsError> {
        self.record(format!("copy {}", path.display()))?;
        Ok(path.with_extension("copy"))
    }

    fn zip(&self, path: &Path) -> Result<PathBuf, FsError> {
        self.record(format!("zip {}", path.display()))?;
        Ok(path.with_extension("zip"))
    }

    fn unzip(&self, path: &Path) -> Result<PathBuf, FsError> {
        self.record(format!("unzip {}", path.display()))?;
        Ok(path.with_extension(""))
    }

    fn create_file(&self, name: &str) -> Result<PathBuf, FsError> {
        self.record(format!("create_file {name}"))?;
        Ok(self.current_dir().join(name))
    }

    fn create_directory(&self, name: &str) -> Result<PathBuf, FsError> {
        self.record(format!("create_directory {name}"))?;
        Ok(self.current_dir().join(name))
    }

    fn delete(&self, path: &Path) -> Result<(), FsError> {
        self.record(format!("delete {}", path.display()))
    }
}

#[derive(Default)]
pub struct FakeClipboard {
    contents: Mutex<Option<String>>,
    failing: bool,
}

impl FakeClipboard {
    pub fn failing() -> Self {
        Self {
            contents: Mutex::new(None),
            failing: true,
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().unwrap().clone()
    }
}

impl Clipboard for FakeClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.failing {
            return Err(ClipboardError("no display".to_string()));
        }
        *self.contents.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}
