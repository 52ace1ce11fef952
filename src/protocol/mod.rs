//! HTTP protocol layer
//!
//! Routes, handlers and response bodies.

pub mod handlers;
pub mod responses;
pub mod routes;

pub use routes::build_router;
