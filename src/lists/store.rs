//! JSON-file backed string sets
//!
//! Each list lives in its own file as a pretty-printed JSON array. The contents
//! are always deduplicated and sorted, both on read and on every write.

use log::{info, warn};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ListError;

/// A sorted, deduplicated list of strings persisted as a JSON array.
///
/// There is no locking: concurrent writers race and the last full-file write wins.
#[derive(Debug, Clone)]
pub struct JsonList {
    path: PathBuf,
    label: &'static str,
}

impl JsonList {
    /// `label` names the list in log output ("hidden", "ignored", ...)
    pub fn new(path: impl Into<PathBuf>, label: &'static str) -> Self {
        Self {
            path: path.into(),
            label,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current entries, deduplicated and sorted.
    ///
    /// A missing or malformed file reads as an empty list.
    pub fn get(&self) -> Vec<String> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("{} list not found: {}", self.label, self.path.display());
                return Vec::new();
            }
            Err(e) => {
                warn!(
                    "Failed to read {} list {}: {}",
                    self.label,
                    self.path.display(),
                    e
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&data) {
            Ok(items) => normalize(items),
            Err(e) => {
                warn!(
                    "json decode error in {} list {}: {}",
                    self.label,
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    pub fn contains(&self, item: &str) -> bool {
        self.get().iter().any(|entry| entry == item)
    }

    /// Adds `item`; returns `false` without touching the file if it is already present.
    pub fn add(&self, item: &str) -> Result<bool, ListError> {
        let mut items = self.get();
        if items.iter().any(|entry| entry == item) {
            return Ok(false);
        }

        items.push(item.to_string());
        self.persist(normalize(items))?;
        info!("Added {:?} to {} list", item, self.label);
        Ok(true)
    }

    /// Removes `item`; returns `false` without touching the file if it is absent.
    pub fn remove(&self, item: &str) -> Result<bool, ListError> {
        let mut items = self.get();
        let Some(position) = items.iter().position(|entry| entry == item) else {
            return Ok(false);
        };

        items.remove(position);
        self.persist(normalize(items))?;
        info!("Removed {:?} from {} list", item, self.label);
        Ok(true)
    }

    fn persist(&self, items: Vec<String>) -> Result<(), ListError> {
        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        items.serialize(&mut serializer)?;

        fs::write(&self.path, buffer)?;
        Ok(())
    }
}

fn normalize(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn list_in(dir: &TempDir) -> JsonList {
        JsonList::new(dir.path().join("hidden.json"), "hidden")
    }

    #[test]
    fn missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        assert!(list_in(&dir).get().is_empty());
    }

    #[test]
    fn malformed_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let list = list_in(&dir);
        fs::write(list.path(), "{ not json").unwrap();
        assert!(list.get().is_empty());

        fs::write(list.path(), r#"{"a": 1}"#).unwrap();
        assert!(list.get().is_empty());
    }

    #[test]
    fn get_dedupes_and_sorts() {
        let dir = TempDir::new().unwrap();
        let list = list_in(&dir);
        fs::write(list.path(), r#"["c", "a", "b", "a"]"#).unwrap();
        assert_eq!(list.get(), vec!["a", "b", "c"]);
    }

    #[test]
    fn add_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let list = list_in(&dir);

        assert!(list.add("photos/2020").unwrap());
        assert!(!list.add("photos/2020").unwrap());
        assert_eq!(list.get(), vec!["photos/2020"]);
    }

    #[test]
    fn add_keeps_sorted_order_on_disk() {
        let dir = TempDir::new().unwrap();
        let list = list_in(&dir);

        list.add("zeta").unwrap();
        list.add("alpha").unwrap();

        let on_disk = fs::read_to_string(list.path()).unwrap();
        assert_eq!(on_disk, "[\n    \"alpha\",\n    \"zeta\"\n]");
    }

    #[test]
    fn add_recovers_from_malformed_file() {
        let dir = TempDir::new().unwrap();
        let list = list_in(&dir);
        fs::write(list.path(), "garbage").unwrap();

        assert!(list.add("music").unwrap());
        assert_eq!(list.get(), vec!["music"]);
    }

    #[test]
    fn remove_absent_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let list = list_in(&dir);
        let original = r#"["b",  "a"]"#;
        fs::write(list.path(), original).unwrap();

        assert!(!list.remove("zzz").unwrap());
        assert_eq!(fs::read_to_string(list.path()).unwrap(), original);
    }

    #[test]
    fn remove_present_item() {
        let dir = TempDir::new().unwrap();
        let list = list_in(&dir);
        list.add("a").unwrap();
        list.add("b").unwrap();

        assert!(list.remove("a").unwrap());
        assert_eq!(list.get(), vec!["b"]);
        assert!(!list.contains("a"));
    }

    #[test]
    fn write_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let list = JsonList::new(dir.path().join("missing-dir").join("list.json"), "hidden");
        assert!(matches!(list.add("a"), Err(ListError::Io(_))));
    }
}
