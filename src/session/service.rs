use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use super::{
    generators::TokenGenerator,
    models::{token_hint, SessionModel},
    repository::SessionRepository,
    types::IssueSessionRequest,
};
use crate::account::{password::PasswordVerifier, repository::AccountRepository};
use crate::shared::AppError;

/// Configuration for session issuance
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub token_bytes: usize,
    pub max_token_attempts: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_bytes: 32,
            max_token_attempts: 5,
        }
    }
}

/// Service for handling session business logic
///
/// Assumes the calling application already passed the access gate.
pub struct SessionService {
    account_repository: Arc<dyn AccountRepository + Send + Sync>,
    session_repository: Arc<dyn SessionRepository + Send + Sync>,
    password_verifier: Arc<dyn PasswordVerifier>,
    token_generator: Arc<dyn TokenGenerator>,
    config: SessionConfig,
}

impl SessionService {
    pub fn new(
        account_repository: Arc<dyn AccountRepository + Send + Sync>,
        session_repository: Arc<dyn SessionRepository + Send + Sync>,
        password_verifier: Arc<dyn PasswordVerifier>,
        token_generator: Arc<dyn TokenGenerator>,
        config: SessionConfig,
    ) -> Self {
        Self {
            account_repository,
            session_repository,
            password_verifier,
            token_generator,
            config,
        }
    }

    /// Verifies the credentials and creates a new session for the account
    #[instrument(skip_all)]
    pub async fn issue(&self, request: IssueSessionRequest) -> Result<SessionModel, AppError> {
        // Presence is checked before any store access, username first.
        // Blank usernames count as missing; lookup uses the value as sent.
        let username = request
            .username
            .as_deref()
            .filter(|username| !username.trim().is_empty())
            .ok_or(AppError::MissingParameter("username"))?;
        let password = request
            .password
            .as_deref()
            .filter(|password| !password.is_empty())
            .ok_or(AppError::MissingParameter("password"))?;

        let account = self
            .account_repository
            .find_account_by_username(username)
            .await?
            .ok_or_else(|| {
                info!(username = %username, "Session refused: unknown account");
                AppError::AccountNotFound
            })?;

        if !self
            .verify_password(&account.password_digest, password)
            .await?
        {
            info!(account_id = %account.id, "Session refused: wrong password");
            return Err(AppError::WrongCredential);
        }

        let session = self.create_unique_session(&account.id).await?;
        info!(
            account_id = %account.id,
            token = %session.token_hint(),
            "Session issued"
        );

        Ok(session)
    }

    /// Runs the password check on the blocking pool; Argon2 is CPU-bound
    async fn verify_password(&self, digest: &str, candidate: &str) -> Result<bool, AppError> {
        let verifier = self.password_verifier.clone();
        let digest = digest.to_string();
        let candidate = candidate.to_string();

        tokio::task::spawn_blocking(move || verifier.verify(&digest, &candidate))
            .await
            .map_err(|e| {
                error!("Password verification task failed: {}", e);
                AppError::Internal
            })
    }

    /// Stores a session under a fresh token, regenerating on collision
    async fn create_unique_session(&self, account_id: &str) -> Result<SessionModel, AppError> {
        let attempts = self.config.max_token_attempts.max(1);

        for attempt in 1..=attempts {
            let session = SessionModel::new(self.token_generator.generate(), account_id.to_string());

            match self.session_repository.create_session(&session).await {
                Ok(()) => return Ok(session),
                Err(AppError::TokenCollision) => {
                    warn!(attempt, max_attempts = attempts, "Session token collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::TokenGenerationExhausted(attempts))
    }

    /// Returns the session stored under the token
    #[instrument(skip_all, fields(token = %token_hint(token)))]
    pub async fn fetch(&self, token: &str) -> Result<SessionModel, AppError> {
        let session = self
            .session_repository
            .find_session_by_token(token)
            .await?
            .ok_or(AppError::SessionNotFound)?;

        debug!(account_id = %session.account_id, "Session fetched");
        Ok(session)
    }

    /// Deletes the session stored under the token
    #[instrument(skip_all, fields(token = %token_hint(token)))]
    pub async fn revoke(&self, token: &str) -> Result<(), AppError> {
        let session = self
            .session_repository
            .find_session_by_token(token)
            .await?
            .ok_or(AppError::SessionNotFound)?;

        // Deleted concurrently between lookup and delete: still not found
        self.session_repository.delete_session(&session.token).await?;

        info!(account_id = %session.account_id, "Session revoked");
        Ok(())
    }
}
