use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the sessions table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SessionModel {
    pub id: String,    // Internal row ID, never used for lookup
    pub token: String, // Opaque random token, unique lookup key
    pub account_id: String,
    pub created_at: DateTime<Utc>,
}

impl SessionModel {
    /// Creates a new session for an account, stamped with the current time
    pub fn new(token: String, account_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            token,
            account_id,
            created_at: Utc::now(),
        }
    }

    /// Short token prefix safe to put in logs
    pub fn token_hint(&self) -> &str {
        token_hint(&self.token)
    }
}

/// Returns at most the first eight characters of a token
pub fn token_hint(token: &str) -> &str {
    match token.char_indices().nth(8) {
        Some((end, _)) => &token[..end],
        None => token,
    }
}
