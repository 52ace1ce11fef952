//! Folder enumeration
//!
//! Walks the storage root and produces the folder choices offered to a caller.
//! The result is recomputed on every call; nothing is cached.

use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::auth::{Identity, SudoerList};
use crate::lists::JsonList;
use crate::storage::validation::to_posix;

/// Lists the folders a caller may choose from.
#[derive(Debug, Clone)]
pub struct FolderEnumerator {
    root: PathBuf,
    ignored: JsonList,
    sudoers: SudoerList,
}

impl FolderEnumerator {
    pub fn new(root: impl Into<PathBuf>, ignored: JsonList, sudoers: SudoerList) -> Self {
        Self {
            root: root.into(),
            ignored,
            sudoers,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every visible folder under the root as a relative POSIX path, sorted.
    ///
    /// Folders matching an ignored pattern are dropped. Dot-folders are dropped
    /// too unless `identity` is a sudoer.
    pub fn list_folders(&self, identity: &Identity) -> Vec<String> {
        let patterns = compile_patterns(&self.ignored.get());
        let is_admin = self.sudoers.is_sudoer(identity);

        filter_folders(walk_folders(&self.root), &patterns, is_admin)
    }
}

/// Collects every directory below `root` (root included, as an empty path),
/// following symbolic links. Unreadable entries are skipped.
pub fn walk_folders(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping entry while walking {}: {}", root.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_dir())
        .filter_map(|entry| entry.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect()
}

/// Compiles ignored patterns as case-insensitive regexes, skipping invalid ones.
pub fn compile_patterns(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| {
            match RegexBuilder::new(pattern).case_insensitive(true).build() {
                Ok(regex) => Some(regex),
                Err(e) => {
                    warn!("Ignoring invalid folder pattern {:?}: {}", pattern, e);
                    None
                }
            }
        })
        .collect()
}

/// Applies the ignore and dot-folder filters and sorts by path components.
pub fn filter_folders(mut folders: Vec<PathBuf>, patterns: &[Regex], is_admin: bool) -> Vec<String> {
    // Component-wise order puts the root first and "a/b" before "a-b"
    folders.sort();

    folders
        .iter()
        .map(|folder| to_posix(folder))
        .filter(|folder| !patterns.iter().any(|pattern| pattern.is_match(folder)))
        .filter(|folder| is_admin || is_visible_to_everyone(folder))
        .collect()
}

/// Dot-folders are admin-only; the root `.` itself stays visible.
fn is_visible_to_everyone(folder: &str) -> bool {
    !(folder.starts_with('.') && folder.len() > 1)
}
