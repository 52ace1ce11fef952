//! Client context
//!
//! Per-request caller information passed explicitly into handlers.

pub mod state;

pub use state::Client;
