use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the accounts table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AccountModel {
    pub id: String,
    pub username: String, // Canonical login identifier, unique
    #[serde(skip_serializing)]
    pub password_digest: String, // Argon2 PHC string
}

impl AccountModel {
    /// Creates a new account model with a generated ID and an already hashed password
    pub fn new(username: String, password_digest: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            password_digest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_model() {
        let account = AccountModel::new("alice".to_string(), "digest".to_string());

        assert_eq!(account.username, "alice");
        assert!(Uuid::parse_str(&account.id).is_ok());
    }

    #[test]
    fn test_password_digest_is_not_serialized() {
        let account = AccountModel::new("alice".to_string(), "secret-digest".to_string());

        let json = serde_json::to_string(&account).unwrap();
        assert!(json.contains("alice"));
        assert!(!json.contains("secret-digest"));
    }
}
