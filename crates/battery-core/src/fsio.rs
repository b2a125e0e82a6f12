//! Filesystem primitives consumed by the generation pipeline.

use std::fmt::Display;
use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::errors::{BatteryError, ErrorInfo};

fn io_error(code: &str, err: impl Display, path: &Path) -> BatteryError {
    BatteryError::Io(ErrorInfo::new(code, err.to_string()).with_path(path))
}

/// Summary of a completed [`copy_tree`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CopyStats {
    /// Number of directories created under the destination (including the root).
    pub directories: usize,
    /// Number of regular files copied.
    pub files: usize,
    /// Total number of bytes copied.
    pub bytes: u64,
}

/// Recursively copies `src` into a new directory at `dest`.
///
/// `dest` must not exist; its parent directories are created as needed.
/// Symbolic links are followed and their targets copied as regular files.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<CopyStats, BatteryError> {
    if !src.is_dir() {
        return Err(BatteryError::Io(
            ErrorInfo::new("battery_core.copy_source", "source is not a directory")
                .with_path(src),
        ));
    }
    if dest.exists() {
        return Err(BatteryError::Io(
            ErrorInfo::new("battery_core.copy_exists", "destination already exists")
                .with_path(dest),
        ));
    }
    let mut stats = CopyStats::default();
    for entry in WalkDir::new(src).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(src).to_path_buf();
            io_error("battery_core.copy_walk", err, &path)
        })?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|err| io_error("battery_core.copy_prefix", err, entry.path()))?;
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .map_err(|err| io_error("battery_core.copy_mkdir", err, &target))?;
            stats.directories += 1;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .map_err(|err| io_error("battery_core.copy_mkdir", err, parent))?;
            }
            let bytes = fs::copy(entry.path(), &target)
                .map_err(|err| io_error("battery_core.copy_file", err, entry.path()))?;
            stats.files += 1;
            stats.bytes += bytes;
        }
    }
    tracing::debug!(
        src = %src.display(),
        dest = %dest.display(),
        files = stats.files,
        "copied tree"
    );
    Ok(stats)
}

/// Reads a UTF-8 text file.
pub fn read_text(path: &Path) -> Result<String, BatteryError> {
    fs::read_to_string(path).map_err(|err| io_error("battery_core.read_text", err, path))
}

/// Writes `contents` to `path`, creating parent directories as needed.
pub fn write_text(path: &Path, contents: &str) -> Result<(), BatteryError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| io_error("battery_core.write_mkdir", err, parent))?;
    }
    fs::write(path, contents).map_err(|err| io_error("battery_core.write_text", err, path))
}

/// Removes a directory tree, treating an already missing tree as success.
pub fn remove_tree(path: &Path) -> Result<(), BatteryError> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(io_error("battery_core.remove_tree", err, path)),
    }
}
