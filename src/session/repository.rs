use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{token_hint, SessionModel};
use crate::shared::AppError;

/// Trait for session repository operations
///
/// Sessions are addressed by token only. `create_session` must fail with
/// `AppError::TokenCollision` when the token is already stored.
#[async_trait]
pub trait SessionRepository {
    async fn create_session(&self, session: &SessionModel) -> Result<(), AppError>;
    async fn find_session_by_token(&self, token: &str) -> Result<Option<SessionModel>, AppError>;
    /// Fails with `AppError::SessionNotFound` when nothing was deleted.
    async fn delete_session(&self, token: &str) -> Result<(), AppError>;
}

/// In-memory implementation of SessionRepository for development and testing
///
/// Data is stored in memory and will be lost when the application restarts.
pub struct InMemorySessionRepository {
    sessions: Mutex<HashMap<String, SessionModel>>, // token -> session
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySessionRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated sessions
    pub fn with_sessions(sessions: Vec<SessionModel>) -> Self {
        let mut session_map = HashMap::new();
        for session in sessions {
            session_map.insert(session.token.clone(), session);
        }

        Self {
            sessions: Mutex::new(session_map),
        }
    }

    /// Returns the current number of sessions in the repository
    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    /// Checks if a session exists by token (useful for debugging)
    pub fn has_session(&self, token: &str) -> bool {
        self.sessions.lock().unwrap().contains_key(token)
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    #[instrument(skip_all)]
    async fn create_session(&self, session: &SessionModel) -> Result<(), AppError> {
        debug!(token = %session.token_hint(), account_id = %session.account_id, "Creating session in memory");

        let mut sessions = self.sessions.lock().unwrap();
        if sessions.contains_key(&session.token) {
            warn!(token = %session.token_hint(), "Session token already exists in memory");
            return Err(AppError::TokenCollision);
        }
        sessions.insert(session.token.clone(), session.clone());

        debug!(token = %session.token_hint(), "Session created successfully in memory");
        Ok(())
    }

    #[instrument(skip_all)]
    async fn find_session_by_token(&self, token: &str) -> Result<Option<SessionModel>, AppError> {
        debug!(token = %token_hint(token), "Fetching session from memory");

        let sessions = self.sessions.lock().unwrap();
        let session = sessions.get(token).cloned();

        match &session {
            Some(s) => {
                debug!(token = %token_hint(token), account_id = %s.account_id, "Session found in memory")
            }
            None => debug!(token = %token_hint(token), "Session not found in memory"),
        }

        Ok(session)
    }

    #[instrument(skip_all)]
    async fn delete_session(&self, token: &str) -> Result<(), AppError> {
        debug!(token = %token_hint(token), "Deleting session from memory");

        let mut sessions = self.sessions.lock().unwrap();
        if sessions.remove(token).is_none() {
            warn!(token = %token_hint(token), "Session not found for deletion in memory");
            return Err(AppError::SessionNotFound);
        }

        debug!(token = %token_hint(token), "Session deleted successfully from memory");
        Ok(())
    }
}

/// PostgreSQL implementation of session repository
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    #[instrument(skip_all)]
    async fn create_session(&self, session: &SessionModel) -> Result<(), AppError> {
        debug!(token = %session.token_hint(), account_id = %session.account_id, "Creating session in database");

        sqlx::query(
            "INSERT INTO sessions (id, token, account_id, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(&session.id)
        .bind(&session.token)
        .bind(&session.account_id)
        .bind(session.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let unique_violation = e
                .as_database_error()
                .is_some_and(|db_error| db_error.is_unique_violation());
            if unique_violation {
                warn!(token = %session.token_hint(), "Session token already exists in database");
                return AppError::TokenCollision;
            }
            warn!(error = %e, "Failed to create session in database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(token = %session.token_hint(), "Session created successfully in database");
        Ok(())
    }

    #[instrument(skip_all)]
    async fn find_session_by_token(&self, token: &str) -> Result<Option<SessionModel>, AppError> {
        debug!(token = %token_hint(token), "Fetching session from database");

        let row = sqlx::query(
            "SELECT id, token, account_id, created_at FROM sessions WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, token = %token_hint(token), "Failed to fetch session from database");
            AppError::DatabaseError(e.to_string())
        })?;

        let session = match row {
            Some(row) => {
                let session = SessionModel {
                    id: row.get("id"),
                    token: row.get("token"),
                    account_id: row.get("account_id"),
                    created_at: row.get("created_at"),
                };
                debug!(token = %token_hint(token), account_id = %session.account_id, "Session found in database");
                Some(session)
            }
            None => {
                debug!(token = %token_hint(token), "Session not found in database");
                None
            }
        };

        Ok(session)
    }

    #[instrument(skip_all)]
    async fn delete_session(&self, token: &str) -> Result<(), AppError> {
        debug!(token = %token_hint(token), "Deleting session from database");

        let result = sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, token = %token_hint(token), "Failed to delete session from database");
                AppError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            warn!(token = %token_hint(token), "Session not found for deletion");
            return Err(AppError::SessionNotFound);
        }

        debug!(token = %token_hint(token), "Session deleted successfully from database");
        Ok(())
    }
}
