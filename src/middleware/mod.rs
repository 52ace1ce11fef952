//! Server middleware
//!
//! Provides audit logging of user actions.

pub mod logging;

pub use logging::AuditLog;
