use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use domy_core::{Result, SyncError};

/// Creates `base` and every missing segment of `relative` beneath it.
///
/// Concurrent installs may race on shared prefixes; a directory that already
/// exists counts as created.
pub fn ensure_dir(base: &Path, relative: &Path) -> Result<PathBuf> {
    fs::create_dir_all(base)
        .map_err(|err| SyncError::fs("failed creating directory", base, err))?;

    let mut current = base.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => {
                current.push(segment);
                create_dir_if_missing(&current)?;
            }
            Component::CurDir => {}
            _ => {
                return Err(SyncError::Validation(format!(
                    "refusing to create directory outside {}: {}",
                    base.display(),
                    relative.display()
                )))
            }
        }
    }
    Ok(current)
}

fn create_dir_if_missing(dir: &Path) -> Result<()> {
    match fs::create_dir(dir) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(err) => Err(SyncError::fs("failed creating directory", dir, err)),
    }
}

/// Removes `dir` with everything below it. Returns false when there was
/// nothing to remove.
pub fn remove_dir_tree(dir: &Path) -> Result<bool> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(SyncError::fs("failed removing directory", dir, err)),
    }
}

/// Writes `content` to `base/relative`, creating intermediate directories.
pub fn write_file(base: &Path, relative: &Path, content: &[u8]) -> Result<PathBuf> {
    let parent = relative.parent().unwrap_or_else(|| Path::new(""));
    let dir = ensure_dir(base, parent)?;
    let Some(file_name) = relative.file_name() else {
        return Err(SyncError::Validation(format!(
            "missing file name in {}",
            relative.display()
        )));
    };

    let path = dir.join(file_name);
    fs::write(&path, content).map_err(|err| SyncError::fs("failed writing file", &path, err))?;
    Ok(path)
}
