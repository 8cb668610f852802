// Public API - what other modules can use
pub use handlers::{create_session, delete_session, get_session};
pub use service::{SessionConfig, SessionService};
pub use types::{IssueSessionRequest, MessageResponse, SessionResponse};

// Internal modules
pub mod generators;
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
mod types;
