use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

use sessions::{
    account::{hash_password, models::AccountModel, InMemoryAccountRepository},
    application::{
        models::ApplicationModel, repository::InMemoryApplicationRepository, APP_KEY_HEADER,
    },
    build_router,
    session::{repository::InMemorySessionRepository, SessionConfig},
    AppState,
};

pub const PREMIUM_KEY: &str = "test_key";
pub const NON_PREMIUM_KEY: &str = "other_key";

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub app: Router,
    pub sessions: Arc<InMemorySessionRepository>,
    pub accounts: Vec<AccountModel>,
}

pub struct TestSetupBuilder {
    accounts: Vec<(String, String)>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self { accounts: vec![] }
    }

    pub fn with_account(mut self, username: &str, password: &str) -> Self {
        self.accounts
            .push((username.to_string(), password.to_string()));
        self
    }

    pub fn build(self) -> TestSetup {
        let accounts: Vec<AccountModel> = self
            .accounts
            .into_iter()
            .map(|(username, password)| {
                AccountModel::new(username, hash_password(&password).unwrap())
            })
            .collect();

        let account_repository = Arc::new(InMemoryAccountRepository::with_accounts(
            accounts.clone(),
        ));
        let application_repository =
            Arc::new(InMemoryApplicationRepository::with_applications(vec![
                ApplicationModel::new("premium app".to_string(), PREMIUM_KEY.to_string(), true),
                ApplicationModel::new(
                    "regular app".to_string(),
                    NON_PREMIUM_KEY.to_string(),
                    false,
                ),
            ]));
        let sessions = Arc::new(InMemorySessionRepository::new());

        let state = AppState::new(
            account_repository,
            application_repository,
            sessions.clone(),
            SessionConfig::default(),
        );

        TestSetup {
            app: build_router(state),
            sessions,
            accounts,
        }
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestSetup {
    pub fn account_id(&self, username: &str) -> String {
        self.accounts
            .iter()
            .find(|account| account.username == username)
            .map(|account| account.id.clone())
            .unwrap()
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        app_key: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = app_key {
            builder = builder.header(APP_KEY_HEADER, key);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
        }
    }

    pub async fn issue(&self, app_key: Option<&str>, body: Value) -> TestResponse {
        self.request("POST", "/sessions", app_key, Some(body)).await
    }

    pub async fn fetch(&self, app_key: Option<&str>, token: &str) -> TestResponse {
        self.request("GET", &format!("/sessions/{}", token), app_key, None)
            .await
    }

    pub async fn revoke(&self, app_key: Option<&str>, token: &str) -> TestResponse {
        self.request("DELETE", &format!("/sessions/{}", token), app_key, None)
            .await
    }
}
