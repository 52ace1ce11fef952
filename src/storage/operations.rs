//! Storage operations
//!
//! Filesystem mutations behind the HTTP routes: upload, delete, mkdir and move.
//! All functions are blocking and take paths relative to the storage root.

use log::{error, info};
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::StorageError;
use crate::storage::results::{DeleteResult, DeletedKind, MoveResult, StoreResult};
use crate::storage::validation::{resolve_entry, resolve_under_root};

/// An uploaded file held in memory until it is written
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Already sanitized
    pub filename: String,
    pub data: Vec<u8>,
}

/// Writes each file into `folder`, overwriting existing files of the same name.
pub fn store_files(
    server_root: &Path,
    folder: &str,
    files: &[UploadedFile],
) -> Result<Vec<StoreResult>, StorageError> {
    let folder_path = resolve_under_root(server_root, folder)?;
    let mut stored = Vec::with_capacity(files.len());

    for file in files {
        let real_path = folder_path.join(&file.filename);
        if let Err(e) = fs::write(&real_path, &file.data) {
            error!("Failed to store {}: {}", real_path.display(), e);
            return Err(StorageError::from(e));
        }

        info!(
            "Stored {} ({} bytes) in folder {}",
            file.filename,
            file.data.len(),
            folder
        );
        stored.push(StoreResult {
            filename: file.filename.clone(),
            real_path,
            size: file.data.len(),
        });
    }

    Ok(stored)
}

/// Removes a file, or a whole tree if `target` is a directory.
pub fn delete_entry(server_root: &Path, target: &str) -> Result<DeleteResult, StorageError> {
    let real_path = resolve_entry(server_root, target)?;

    let (kind, outcome) = if real_path.is_dir() {
        (DeletedKind::Tree, fs::remove_dir_all(&real_path))
    } else {
        (DeletedKind::File, fs::remove_file(&real_path))
    };

    match outcome {
        Ok(()) => {
            info!("Deleted {:?} {} (real: {})", kind, target, real_path.display());
            Ok(DeleteResult { kind, real_path })
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(StorageError::FileNotFound(target.to_string()))
        }
        Err(e) => {
            error!("Failed to delete {} (real: {}): {}", target, real_path.display(), e);
            Err(StorageError::from(e))
        }
    }
}

/// Creates `target` and any missing parents. Fails if it already exists.
pub fn make_directory(server_root: &Path, target: &str) -> Result<(), StorageError> {
    let real_path = resolve_under_root(server_root, target)?;

    if fs::symlink_metadata(&real_path).is_ok() {
        return Err(StorageError::FileAlreadyExists(target.to_string()));
    }

    fs::create_dir_all(&real_path)?;
    info!("Created directory {} (real: {})", target, real_path.display());
    Ok(())
}

/// Moves `from` to `to`. If `to` is an existing directory the source is moved
/// inside it. An existing entry there, or an existing `to` when moving a
/// directory, is never overwritten. Renames across filesystems fall back to
/// copy then remove.
pub fn move_entry(server_root: &Path, from: &str, to: &str) -> Result<MoveResult, StorageError> {
    let source = resolve_entry(server_root, from)?;
    let mut destination = resolve_under_root(server_root, to)?;

    if fs::symlink_metadata(&source).is_err() {
        return Err(StorageError::FileNotFound(from.to_string()));
    }

    // Moving a file onto itself changes nothing
    if destination == source && !source.is_dir() {
        return Ok(MoveResult {
            source,
            destination,
        });
    }

    let mut into_directory = false;
    if destination.is_dir() {
        if let Some(name) = source.file_name() {
            destination = destination.join(name);
            into_directory = true;
        }
    }

    if destination.starts_with(&source) {
        return Err(StorageError::InvalidPath(to.to_string()));
    }

    if (into_directory || source.is_dir()) && fs::symlink_metadata(&destination).is_ok() {
        return Err(StorageError::FileAlreadyExists(to.to_string()));
    }

    match fs::rename(&source, &destination) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(StorageError::FileNotFound(from.to_string()));
        }
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            info!(
                "Rename {} -> {} crosses devices, copying instead",
                source.display(),
                destination.display()
            );
            copy_then_remove(&source, &destination)?;
        }
        Err(e) => {
            error!(
                "Failed to move {} to {}: {}",
                source.display(),
                destination.display(),
                e
            );
            return Err(StorageError::from(e));
        }
    }

    info!("Moved {} to {}", source.display(), destination.display());
    Ok(MoveResult {
        source,
        destination,
    })
}

fn copy_then_remove(source: &Path, destination: &Path) -> Result<(), StorageError> {
    if source.is_dir() {
        for entry in WalkDir::new(source) {
            let entry = entry.map_err(io::Error::from)?;
            let relative = entry
                .path()
                .strip_prefix(source)
                .map_err(|_| StorageError::InvalidPath(entry.path().display().to_string()))?;
            let target = destination.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                fs::copy(entry.path(), &target)?;
            }
        }
        fs::remove_dir_all(source)?;
    } else {
        fs::copy(source, destination)?;
        fs::remove_file(source)?;
    }
    Ok(())
}
