use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

use crate::account::{password::Argon2PasswordVerifier, repository::AccountRepository};
use crate::application::repository::ApplicationRepository;
use crate::session::{
    generators::RandomHexTokenGenerator,
    repository::SessionRepository,
    service::{SessionConfig, SessionService},
};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub application_repository: Arc<dyn ApplicationRepository + Send + Sync>,
    pub session_service: Arc<SessionService>,
}

impl AppState {
    pub fn new(
        account_repository: Arc<dyn AccountRepository + Send + Sync>,
        application_repository: Arc<dyn ApplicationRepository + Send + Sync>,
        session_repository: Arc<dyn SessionRepository + Send + Sync>,
        config: SessionConfig,
    ) -> Self {
        let session_service = SessionService::new(
            account_repository,
            session_repository,
            Arc::new(Argon2PasswordVerifier::new()),
            Arc::new(RandomHexTokenGenerator::new(config.token_bytes)),
            config,
        );

        Self {
            application_repository,
            session_service: Arc::new(session_service),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Account not found")]
    AccountNotFound,

    #[error("Wrong credential")]
    WrongCredential,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Application not found")]
    ApplicationNotFound,

    #[error("Application not authorized")]
    ApplicationNotAuthorized,

    #[error("Request body larger than {0} bytes")]
    PayloadTooLarge(usize),

    /// Raised by session stores when a token is already taken; retried by the service.
    #[error("Session token collision")]
    TokenCollision,

    #[error("Could not generate a unique session token after {0} attempts")]
    TokenGenerationExhausted(u32),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    Internal,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            AppError::AccountNotFound
            | AppError::SessionNotFound
            | AppError::ApplicationNotFound => StatusCode::NOT_FOUND,
            AppError::WrongCredential | AppError::ApplicationNotAuthorized => {
                StatusCode::FORBIDDEN
            }
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::TokenCollision
            | AppError::TokenGenerationExhausted(_)
            | AppError::DatabaseError(_)
            | AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Request field the error is about, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            AppError::MissingParameter(field) => Some(*field),
            AppError::AccountNotFound => Some("username"),
            AppError::WrongCredential => Some("password"),
            AppError::SessionNotFound => Some("session_id"),
            AppError::ApplicationNotFound | AppError::ApplicationNotAuthorized => Some("app_key"),
            _ => None,
        }
    }

    /// Machine-readable error kind for client-facing errors
    pub fn kind(&self) -> Option<&'static str> {
        match self {
            AppError::MissingParameter(_) => Some("required"),
            AppError::AccountNotFound
            | AppError::SessionNotFound
            | AppError::ApplicationNotFound => Some("unknown"),
            AppError::WrongCredential => Some("wrong"),
            AppError::ApplicationNotAuthorized => Some("forbidden"),
            _ => None,
        }
    }

    /// Wiki page documenting a client-facing error
    pub fn docs(&self) -> Option<&'static str> {
        match self {
            AppError::MissingParameter("username") => {
                Some("https://github.com/jdr-tools/wiki/wiki/Sessions-API#username-not-given")
            }
            AppError::MissingParameter("password") => {
                Some("https://github.com/jdr-tools/wiki/wiki/Sessions-API#password-not-given")
            }
            AppError::AccountNotFound => {
                Some("https://github.com/jdr-tools/wiki/wiki/Sessions-API#account-not-found")
            }
            AppError::WrongCredential => {
                Some("https://github.com/jdr-tools/wiki/wiki/Sessions-API#password-not-matching")
            }
            AppError::SessionNotFound => {
                Some("https://github.com/jdr-tools/wiki/wiki/Sessions-API#session-not-found")
            }
            AppError::ApplicationNotAuthorized => {
                Some("https://github.com/jdr-tools/wiki/wiki/Common-errors#application-not-premium")
            }
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match (self.field(), self.kind()) {
            (Some(field), Some(kind)) => {
                let mut body = json!({
                    "status": status.as_u16(),
                    "field": field,
                    "error": kind,
                });
                if let Some(docs) = self.docs() {
                    body["docs"] = json!(docs);
                }
                body
            }
            _ => {
                if status.is_server_error() {
                    error!(error = %self, "Request failed with internal error");
                }
                let message = match self {
                    AppError::DatabaseError(_) => "Database error".to_string(),
                    other => other.to_string(),
                };
                json!({
                    "status": status.as_u16(),
                    "error": message,
                })
            }
        };

        (status, Json(body)).into_response()
    }
}
