//! `FileSystem` implementation backed by the local disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use log::{debug, info, warn};
use walkdir::WalkDir;

use super::archive::{unzip_path, zip_path};
use super::{validate_name, DirTarget, Entry, FileSystem, FsError, Listing};

pub struct LocalFs {
    cwd: Mutex<PathBuf>,
}

impl LocalFs {
    pub fn new(start_dir: PathBuf) -> Self {
        Self {
            cwd: Mutex::new(start_dir),
        }
    }

    /// Starts in the directory the process was launched from.
    pub fn from_process_dir() -> io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    fn set_current_dir(&self, dir: PathBuf) {
        *self.cwd.lock().unwrap_or_else(PoisonError::into_inner) = dir;
    }

    fn resolve(&self, target: &DirTarget) -> Result<PathBuf, FsError> {
        let cwd = self.current_dir();
        let raw = match target {
            DirTarget::Current => cwd,
            DirTarget::Parent => cwd
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| FsError::NoParent(cwd.clone()))?,
            DirTarget::Home => dirs::home_dir().ok_or(FsError::NoHomeDirectory)?,
            DirTarget::Path(path) if path.is_absolute() => path.clone(),
            DirTarget::Path(path) => cwd.join(path),
        };
        let dir = raw.canonicalize().map_err(|e| FsError::io(&raw, e))?;
        if !dir.is_dir() {
            return Err(FsError::NotADirectory(dir));
        }
        Ok(dir)
    }
}

impl FileSystem for LocalFs {
    fn current_dir(&self) -> PathBuf {
        self.cwd
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn list_directory(&self, target: &DirTarget, show_hidden: bool) -> Result<Listing, FsError> {
        let dir = self.resolve(target)?;
        let mut entries = Vec::new();
        for item in fs::read_dir(&dir).map_err(|e| FsError::io(&dir, e))? {
            let item = item.map_err(|e| FsError::io(&dir, e))?;
            let path = item.path();
            // Broken symlinks have no target metadata; show the link itself.
            let metadata = match fs::metadata(&path) {
                Ok(m) => m,
                Err(_) => match item.metadata() {
                    Ok(m) => m,
                    Err(e) => {
                        warn!("Skipping {}: {}", path.display(), e);
                        continue;
                    }
                },
            };
            let entry = Entry::from_metadata(path, &metadata);
            if show_hidden || !entry.is_hidden() {
                entries.push(entry);
            }
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        debug!("Listed {} ({} entries)", dir.display(), entries.len());
        self.set_current_dir(dir.clone());
        Ok(Listing { dir, entries })
    }

    fn copy(&self, path: &Path) -> Result<PathBuf, FsError> {
        let metadata = fs::metadata(path).map_err(|e| FsError::io(path, e))?;
        let parent = parent_of(path)?;
        if metadata.is_dir() {
            let destination = unique_sibling(&parent, &timestamped(&file_name(path)), None);
            if let Err(e) = copy_dir_recursive(path, &destination) {
                discard_partial(&destination);
                return Err(e);
            }
            info!("Copied directory {} to {}", path.display(), destination.display());
            Ok(destination)
        } else {
            let (stem, ext) = stem_and_extension(path);
            let destination = unique_sibling(&parent, &timestamped(&stem), ext.as_deref());
            fs::copy(path, &destination).map_err(|e| FsError::io(path, e))?;
            info!("Copied file {} to {}", path.display(), destination.display());
            Ok(destination)
        }
    }

    fn zip(&self, path: &Path) -> Result<PathBuf, FsError> {
        let parent = parent_of(path)?;
        let base = if path.is_dir() {
            file_name(path)
        } else {
            stem_and_extension(path).0
        };
        let destination = unique_sibling(&parent, &timestamped(&base), Some("zip"));
        if let Err(e) = zip_path(path, &destination) {
            discard_partial(&destination);
            return Err(e);
        }
        Ok(destination)
    }

    fn unzip(&self, path: &Path) -> Result<PathBuf, FsError> {
        let parent = parent_of(path)?;
        let (stem, _) = stem_and_extension(path);
        let destination = unique_sibling(&parent, &stem, None);
        unzip_path(path, &destination).inspect_err(|_| discard_partial(&destination))
    }

    fn create_file(&self, name: &str) -> Result<PathBuf, FsError> {
        let path = self.current_dir().join(validate_name(name)?);
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| FsError::io(&path, e))?;
        info!("Created file {}", path.display());
        Ok(path)
    }

    fn create_directory(&self, name: &str) -> Result<PathBuf, FsError> {
        let path = self.current_dir().join(validate_name(name)?);
        if !path.is_dir() {
            fs::create_dir(&path).map_err(|e| FsError::io(&path, e))?;
            info!("Created directory {}", path.display());
        }
        Ok(path)
    }

    fn delete(&self, path: &Path) -> Result<(), FsError> {
        let metadata = fs::symlink_metadata(path).map_err(|e| FsError::io(path, e))?;
        if metadata.is_dir() {
            fs::remove_dir_all(path).map_err(|e| FsError::io(path, e))?;
        } else {
            fs::remove_file(path).map_err(|e| FsError::io(path, e))?;
        }
        info!("Deleted {}", path.display());
        Ok(())
    }
}

fn parent_of(path: &Path) -> Result<PathBuf, FsError> {
    path.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| FsError::NoParent(path.to_path_buf()))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn stem_and_extension(path: &Path) -> (String, Option<String>) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path.extension().map(|e| e.to_string_lossy().into_owned());
    (stem, ext)
}

fn timestamped(base: &str) -> String {
    format!("{base}_{}", Utc::now().timestamp())
}

/// `parent/base[.ext]`, with `-1`, `-2`, ... appended to `base` until the
/// path is free.
fn unique_sibling(parent: &Path, base: &str, ext: Option<&str>) -> PathBuf {
    let build = |suffix: String| match ext {
        Some(ext) => parent.join(format!("{base}{suffix}.{ext}")),
        None => parent.join(format!("{base}{suffix}")),
    };
    let mut candidate = build(String::new());
    let mut n = 1;
    while candidate.exists() {
        candidate = build(format!("-{n}"));
        n += 1;
    }
    candidate
}

fn copy_dir_recursive(source: &Path, destination: &Path) -> Result<(), FsError> {
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|e| FsError::io(source, io::Error::from(e)))?;
        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let target = destination.join(relative);
        if entry.file_type().is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| FsError::io(&target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| FsError::io(entry.path(), e))?;
        }
    }
    Ok(())
}

/// Recreates the link itself rather than copying what it points at.
#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> Result<(), FsError> {
    let points_to = fs::read_link(link).map_err(|e| FsError::io(link, e))?;
    std::os::unix::fs::symlink(&points_to, target).map_err(|e| FsError::io(target, e))
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, _target: &Path) -> Result<(), FsError> {
    warn!("Skipping symlink {}", link.display());
    Ok(())
}

/// Removes whatever a failed copy, zip or unzip left at `path`.
fn discard_partial(path: &Path) {
    let result = match fs::symlink_metadata(path) {
        Ok(m) if m.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(_) => return,
    };
    match result {
        Ok(()) => debug!("Removed partial output {}", path.display()),
        Err(e) => warn!("Could not remove partial output {}: {}", path.display(), e),
    }
}
