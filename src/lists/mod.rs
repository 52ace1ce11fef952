//! Persistent lists
//!
//! Small JSON arrays used as sets: ignored folder patterns, hidden folders and sudoers.

pub mod store;

pub use store::JsonList;
