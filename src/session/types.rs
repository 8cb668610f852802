use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use super::models::SessionModel;

/// Request payload for creating a session
///
/// Both fields are optional at the wire level so that absence is reported
/// as a missing parameter rather than a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct IssueSessionRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Public representation of a session
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionResponse {
    pub token: String,
    pub created_at: String, // ISO-8601, UTC, second precision
    pub account_id: String,
}

impl From<&SessionModel> for SessionResponse {
    fn from(session: &SessionModel) -> Self {
        Self {
            token: session.token.clone(),
            created_at: session
                .created_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            account_id: session.account_id.clone(),
        }
    }
}

/// Response body for a successful revocation
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn deleted() -> Self {
        Self {
            message: "deleted".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_session_response_from_model() {
        let mut session = SessionModel::new("abc".to_string(), "account-1".to_string());
        session.created_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap()
            + chrono::Duration::milliseconds(250);

        let response = SessionResponse::from(&session);

        assert_eq!(response.token, "abc");
        assert_eq!(response.account_id, "account-1");
        assert_eq!(response.created_at, "2024-03-01T12:30:05Z");
    }

    #[test]
    fn test_session_response_does_not_expose_internal_id() {
        let session = SessionModel::new("abc".to_string(), "account-1".to_string());

        let json = serde_json::to_value(SessionResponse::from(&session)).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 3);
        assert!(!json.to_string().contains(&session.id));
    }

    #[test]
    fn test_issue_request_accepts_missing_fields() {
        let request: IssueSessionRequest = serde_json::from_str(r#"{"username": "alice"}"#).unwrap();

        assert_eq!(request.username.as_deref(), Some("alice"));
        assert!(request.password.is_none());
    }
}
