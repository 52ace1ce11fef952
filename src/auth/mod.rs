//! Authentication system
//!
//! Handles caller identity and the sudoer allowlist.

pub mod identity;
pub mod sudoers;

pub use identity::Identity;
pub use sudoers::SudoerList;
