use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for registered client applications
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ApplicationModel {
    pub id: String,
    pub name: String,
    pub key: String, // API key presented by the calling application
    pub premium: bool,
}

impl ApplicationModel {
    /// Creates a new application model with a generated ID
    pub fn new(name: String, key: String, premium: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            key,
            premium,
        }
    }
}
