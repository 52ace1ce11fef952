//! Storage result types
//!
//! Defines result structures returned by storage operations.

use std::path::PathBuf;

/// What a delete removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletedKind {
    Tree,
    File,
}

/// Result of a delete operation
#[derive(Debug, Clone)]
pub struct DeleteResult {
    pub kind: DeletedKind,
    pub real_path: PathBuf,
}

/// Result of a move operation
#[derive(Debug, Clone)]
pub struct MoveResult {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// One uploaded file, as written to disk
#[derive(Debug, Clone)]
pub struct StoreResult {
    pub filename: String,
    pub real_path: PathBuf,
    pub size: usize,
}
