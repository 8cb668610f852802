// Public API - what other modules can use
pub use password::{hash_password, Argon2PasswordVerifier, PasswordVerifier};
pub use repository::{AccountRepository, InMemoryAccountRepository, PostgresAccountRepository};

// Internal modules
pub mod models;
pub mod password;
pub mod repository;
