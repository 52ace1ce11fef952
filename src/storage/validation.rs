//! Path validation
//!
//! Resolves user-supplied relative paths under the storage root and sanitizes
//! upload filenames.

use std::path::{Component, Path, PathBuf};

use crate::error::StorageError;

/// Resolves `relative` lexically under `root`.
///
/// `.` components are dropped and `..` pops one component; climbing above the
/// root or passing an absolute path is rejected. An empty result is the root.
pub fn resolve_under_root(root: &Path, relative: &str) -> Result<PathBuf, StorageError> {
    let mut resolved = PathBuf::new();

    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !resolved.pop() {
                    return Err(StorageError::PathTraversal(relative.to_string()));
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(StorageError::PathTraversal(relative.to_string()));
            }
        }
    }

    Ok(root.join(resolved))
}

/// Like [`resolve_under_root`] but refuses the root itself.
pub fn resolve_entry(root: &Path, relative: &str) -> Result<PathBuf, StorageError> {
    let resolved = resolve_under_root(root, relative)?;
    if resolved == root {
        return Err(StorageError::InvalidPath(relative.to_string()));
    }
    Ok(resolved)
}

/// Reduces an uploaded filename to a safe basename.
///
/// Non-ASCII characters are dropped, separators become spaces, whitespace runs
/// become `_`, anything outside `[A-Za-z0-9_.-]` is removed and leading or
/// trailing `.`/`_` are stripped. Returns `None` if nothing usable is left.
pub fn sanitize_filename(filename: &str) -> Option<String> {
    let spaced: String = filename
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Relative path rendered with `/` separators; the root itself is `.`.
pub fn to_posix(relative: &Path) -> String {
    let parts: Vec<_> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_nested_paths() {
        let root = Path::new("/cloud");
        assert_eq!(
            resolve_under_root(root, "hello/world").unwrap(),
            PathBuf::from("/cloud/hello/world")
        );
        assert_eq!(
            resolve_under_root(root, "p123/cdcdsc/../plt").unwrap(),
            PathBuf::from("/cloud/p123/plt")
        );
        assert_eq!(resolve_under_root(root, ".").unwrap(), PathBuf::from("/cloud"));
        assert_eq!(
            resolve_under_root(root, "complex/$5").unwrap(),
            PathBuf::from("/cloud/complex/$5")
        );
    }

    #[test]
    fn rejects_escaping_paths() {
        let root = Path::new("/cloud");
        assert!(matches!(
            resolve_under_root(root, "../etc/passwd"),
            Err(StorageError::PathTraversal(_))
        ));
        assert!(matches!(
            resolve_under_root(root, "a/../../b"),
            Err(StorageError::PathTraversal(_))
        ));
        assert!(matches!(
            resolve_under_root(root, "/etc"),
            Err(StorageError::PathTraversal(_))
        ));
    }

    #[test]
    fn entry_cannot_be_root() {
        let root = Path::new("/cloud");
        assert!(matches!(
            resolve_entry(root, "a/.."),
            Err(StorageError::InvalidPath(_))
        ));
        assert!(resolve_entry(root, "a").is_ok());
    }

    #[test]
    fn sanitizes_like_secure_filename() {
        assert_eq!(sanitize_filename("test.pdf").as_deref(), Some("test.pdf"));
        assert_eq!(
            sanitize_filename("My cool movie.mov").as_deref(),
            Some("My_cool_movie.mov")
        );
        assert_eq!(
            sanitize_filename("../../../etc/passwd").as_deref(),
            Some("etc_passwd")
        );
        assert_eq!(
            sanitize_filename("i contain cool \u{fc}ml\u{e4}uts.txt").as_deref(),
            Some("i_contain_cool_mluts.txt")
        );
        assert_eq!(sanitize_filename("..").as_deref(), None);
        assert_eq!(sanitize_filename("").as_deref(), None);
    }

    #[test]
    fn posix_rendering() {
        assert_eq!(to_posix(Path::new("")), ".");
        assert_eq!(to_posix(Path::new("a/b")), "a/b");
    }
}
