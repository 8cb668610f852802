use std::str::FromStr;
use tracing::info;

use crate::account::{hash_password, models::AccountModel, InMemoryAccountRepository};
use crate::application::{models::ApplicationModel, repository::InMemoryApplicationRepository};
use crate::session::{generators::MIN_TOKEN_BYTES, SessionConfig};
use crate::shared::AppError;

/// Process configuration read from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// PostgreSQL connection string; in-memory repositories are used when unset
    pub database_url: Option<String>,
    pub session: SessionConfig,
    pub seed: SeedConfig,
}

/// Records loaded into the in-memory repositories when no database is configured
#[derive(Debug, Clone, Default)]
pub struct SeedConfig {
    /// Key of a premium application (`SEED_APP_KEY`)
    pub app_key: Option<String>,
    /// `SEED_ACCOUNT_USERNAME` and `SEED_ACCOUNT_PASSWORD`
    pub account: Option<(String, String)>,
}

impl SeedConfig {
    pub fn in_memory_repositories(
        &self,
    ) -> Result<(InMemoryAccountRepository, InMemoryApplicationRepository), AppError> {
        let accounts = InMemoryAccountRepository::new();
        let applications = InMemoryApplicationRepository::new();

        if let Some(key) = &self.app_key {
            applications.insert_application(ApplicationModel::new(
                "seed".to_string(),
                key.clone(),
                true,
            ));
            info!("Seeded premium application");
        }

        if let Some((username, password)) = &self.account {
            accounts.insert_account(AccountModel::new(
                username.clone(),
                hash_password(password)?,
            ));
            info!(username = %username, "Seeded account");
        }

        Ok((accounts, applications))
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = SessionConfig::default();

        let token_bytes = parse_or(&lookup, "SESSION_TOKEN_BYTES", defaults.token_bytes)
            .max(MIN_TOKEN_BYTES);
        let max_token_attempts =
            parse_or(&lookup, "SESSION_TOKEN_MAX_ATTEMPTS", defaults.max_token_attempts).max(1);

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            session: SessionConfig {
                token_bytes,
                max_token_attempts,
            },
            seed: SeedConfig {
                app_key: lookup("SEED_APP_KEY").filter(|key| !key.is_empty()),
                account: lookup("SEED_ACCOUNT_USERNAME")
                    .filter(|username| !username.is_empty())
                    .zip(lookup("SEED_ACCOUNT_PASSWORD").filter(|password| !password.is_empty())),
            },
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T {
    lookup(name)
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
