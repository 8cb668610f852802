// Public API - what other modules can use
pub use gate::{evaluate, RoutePolicy};
pub use middleware::{application_gate, APP_KEY_HEADER};

// Internal modules
mod gate;
mod middleware;
pub mod models;
pub mod repository;
