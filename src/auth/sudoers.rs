//! Sudoer allowlist
//!
//! Read-only view over the sudoers JSON list. Sudoers see dot-prefixed folders.

use std::path::PathBuf;

use crate::auth::Identity;
use crate::lists::JsonList;

#[derive(Debug, Clone)]
pub struct SudoerList {
    list: JsonList,
}

impl SudoerList {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            list: JsonList::new(path, "sudoers"),
        }
    }

    pub fn usernames(&self) -> Vec<String> {
        self.list.get()
    }

    /// The anonymous identity is never a sudoer.
    pub fn is_sudoer(&self, identity: &Identity) -> bool {
        identity
            .username()
            .is_some_and(|name| self.list.contains(name))
    }
}
