pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod lists;
pub mod middleware;
pub mod protocol;
pub mod server;
pub mod storage;

pub use config::ServerConfig;
pub use server::{AppState, Server};
