use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::AccountModel;
use crate::shared::AppError;

/// Read-only lookup of accounts by their login identifier
#[async_trait]
pub trait AccountRepository {
    async fn find_account_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AccountModel>, AppError>;
}

/// In-memory implementation of AccountRepository for development and testing
pub struct InMemoryAccountRepository {
    accounts: Mutex<HashMap<String, AccountModel>>, // username -> account
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated accounts
    pub fn with_accounts(accounts: Vec<AccountModel>) -> Self {
        let account_map = accounts
            .into_iter()
            .map(|account| (account.username.clone(), account))
            .collect();

        Self {
            accounts: Mutex::new(account_map),
        }
    }

    /// Adds an account, replacing any account with the same username
    pub fn insert_account(&self, account: AccountModel) {
        self.accounts
            .lock()
            .unwrap()
            .insert(account.username.clone(), account);
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    #[instrument(skip(self))]
    async fn find_account_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AccountModel>, AppError> {
        debug!(username = %username, "Fetching account from memory");

        let account = self.accounts.lock().unwrap().get(username).cloned();
        if account.is_none() {
            debug!(username = %username, "Account not found in memory");
        }

        Ok(account)
    }
}

/// PostgreSQL implementation of account repository
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    #[instrument(skip(self))]
    async fn find_account_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AccountModel>, AppError> {
        debug!(username = %username, "Fetching account from database");

        let row = sqlx::query("SELECT id, username, password_digest FROM accounts WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, username = %username, "Failed to fetch account from database");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(row.map(|row| AccountModel {
            id: row.get("id"),
            username: row.get("username"),
            password_digest: row.get("password_digest"),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_existing_account() {
        let account = AccountModel::new("alice".to_string(), "digest".to_string());
        let repo = InMemoryAccountRepository::with_accounts(vec![account.clone()]);

        let found = repo.find_account_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, account.id);
        assert_eq!(found.password_digest, "digest");
    }

    #[tokio::test]
    async fn test_find_unknown_account() {
        let repo = InMemoryAccountRepository::new();
        repo.insert_account(AccountModel::new("alice".to_string(), "digest".to_string()));

        let found = repo.find_account_by_username("bob").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_lookup_is_exact_match() {
        let repo = InMemoryAccountRepository::new();
        repo.insert_account(AccountModel::new("alice".to_string(), "digest".to_string()));

        assert!(repo.find_account_by_username("Alice").await.unwrap().is_none());
        assert!(repo.find_account_by_username("alice ").await.unwrap().is_none());
    }
}
