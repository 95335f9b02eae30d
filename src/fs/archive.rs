//! Zip and unzip helpers used by `LocalFs`.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::FsError;

fn archive_error(path: &Path, err: impl std::fmt::Display) -> FsError {
    FsError::Archive {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Zip name for `relative`, always `/`-separated.
fn archive_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Writes `source` (file or directory) into a new archive at `destination`.
///
/// Directory contents are stored under the directory's own name so that
/// extracting the archive recreates the folder.
pub(super) fn zip_path(source: &Path, destination: &Path) -> Result<(), FsError> {
    let file = File::create(destination).map_err(|e| FsError::io(destination, e))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let base = source.parent().unwrap_or(source);
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(|e| FsError::io(source, io::Error::from(e)))?;
        let relative = entry.path().strip_prefix(base).unwrap_or(entry.path());
        let name = archive_name(relative);
        if entry.file_type().is_symlink() {
            warn!("Skipping symlink {}", entry.path().display());
            continue;
        }
        if entry.file_type().is_dir() {
            zip.add_directory(format!("{name}/"), options)
                .map_err(|e| archive_error(destination, e))?;
        } else {
            zip.start_file(name, options)
                .map_err(|e| archive_error(destination, e))?;
            let mut input = File::open(entry.path()).map_err(|e| FsError::io(entry.path(), e))?;
            io::copy(&mut input, &mut zip).map_err(|e| FsError::io(entry.path(), e))?;
        }
        debug!("Zipped {}", entry.path().display());
    }

    zip.finish().map_err(|e| archive_error(destination, e))?;
    info!("Wrote archive {}", destination.display());
    Ok(())
}

/// Extracts `archive` into `destination`, creating it if needed.
pub(super) fn unzip_path(archive: &Path, destination: &Path) -> Result<PathBuf, FsError> {
    let file = File::open(archive).map_err(|e| FsError::io(archive, e))?;
    let mut zip = ZipArchive::new(file).map_err(|e| archive_error(archive, e))?;
    std::fs::create_dir_all(destination).map_err(|e| FsError::io(destination, e))?;
    zip.extract(destination)
        .map_err(|e| archive_error(archive, e))?;
    info!(
        "Extracted {} entries from {} into {}",
        zip.len(),
        archive.display(),
        destination.display()
    );
    Ok(destination.to_path_buf())
}
