// Library crate for the sessions service
// This file exposes the public API for the binary and integration tests

pub mod account;
pub mod application;
pub mod config;
pub mod router;
pub mod session;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use config::ServerConfig;
pub use router::build_router;
pub use shared::{AppError, AppState};
