//! Server core functionality
//!
//! This module contains the HTTP server, its shared state and the
//! core infrastructure for the cloud server.

pub mod core;
pub mod state;

pub use self::core::Server;
pub use self::state::AppState;
