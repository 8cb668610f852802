use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::types::{IssueSessionRequest, MessageResponse, SessionResponse};
use crate::shared::{AppError, AppState};

/// HTTP handler for creating a new session
///
/// POST /sessions
/// Returns 201 with the created session
#[instrument(name = "create_session", skip_all)]
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<IssueSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    info!("Creating new session");

    let session = state.session_service.issue(request).await?;

    info!(
        account_id = %session.account_id,
        token_length = session.token.len(),
        "Session created successfully"
    );

    Ok((StatusCode::CREATED, Json(SessionResponse::from(&session))))
}

/// HTTP handler for fetching a session by token
///
/// GET /sessions/:token
#[instrument(name = "get_session", skip_all)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.session_service.fetch(&token).await?;
    Ok(Json(SessionResponse::from(&session)))
}

/// HTTP handler for revoking a session by token
///
/// DELETE /sessions/:token
#[instrument(name = "delete_session", skip_all)]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.session_service.revoke(&token).await?;

    info!("Session deleted");
    Ok(Json(MessageResponse::deleted()))
}
