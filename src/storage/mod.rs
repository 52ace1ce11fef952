//! File system storage management
//!
//! Handles folder enumeration, file operations and path validation.

pub mod folders;
pub mod operations;
pub mod results;
pub mod validation;

pub use folders::FolderEnumerator;
pub use operations::{UploadedFile, delete_entry, make_directory, move_entry, store_files};
pub use results::{DeleteResult, DeletedKind, MoveResult, StoreResult};
pub use validation::{resolve_under_root, sanitize_filename};
