use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::ApplicationModel;
use crate::shared::AppError;

/// Read-only lookup of registered applications by API key
#[async_trait]
pub trait ApplicationRepository {
    async fn find_application_by_key(&self, key: &str)
        -> Result<Option<ApplicationModel>, AppError>;
}

/// In-memory implementation of ApplicationRepository for development and testing
pub struct InMemoryApplicationRepository {
    applications: Mutex<HashMap<String, ApplicationModel>>, // key -> application
}

impl Default for InMemoryApplicationRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryApplicationRepository {
    pub fn new() -> Self {
        Self {
            applications: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-registered applications
    pub fn with_applications(applications: Vec<ApplicationModel>) -> Self {
        let application_map = applications
            .into_iter()
            .map(|application| (application.key.clone(), application))
            .collect();

        Self {
            applications: Mutex::new(application_map),
        }
    }

    pub fn insert_application(&self, application: ApplicationModel) {
        self.applications
            .lock()
            .unwrap()
            .insert(application.key.clone(), application);
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    #[instrument(skip(self, key))]
    async fn find_application_by_key(
        &self,
        key: &str,
    ) -> Result<Option<ApplicationModel>, AppError> {
        let application = self.applications.lock().unwrap().get(key).cloned();

        match &application {
            Some(a) => debug!(application = %a.name, premium = a.premium, "Application found in memory"),
            None => debug!("Application not found in memory"),
        }

        Ok(application)
    }
}

/// PostgreSQL implementation of application repository
pub struct PostgresApplicationRepository {
    pool: PgPool,
}

impl PostgresApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationRepository for PostgresApplicationRepository {
    #[instrument(skip(self, key))]
    async fn find_application_by_key(
        &self,
        key: &str,
    ) -> Result<Option<ApplicationModel>, AppError> {
        let row = sqlx::query("SELECT id, name, key, premium FROM applications WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to fetch application from database");
                AppError::DatabaseError(e.to_string())
            })?;

        let application = row.map(|row| ApplicationModel {
            id: row.get("id"),
            name: row.get("name"),
            key: row.get("key"),
            premium: row.get("premium"),
        });

        match &application {
            Some(a) => debug!(application = %a.name, premium = a.premium, "Application found in database"),
            None => debug!("Application not found in database"),
        }

        Ok(application)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_application_by_key() {
        let application =
            ApplicationModel::new("dashboard".to_string(), "test_key".to_string(), true);
        let repo = InMemoryApplicationRepository::with_applications(vec![application.clone()]);

        let found = repo.find_application_by_key("test_key").await.unwrap().unwrap();
        assert_eq!(found.id, application.id);
        assert!(found.premium);
    }

    #[tokio::test]
    async fn test_find_unknown_key() {
        let repo = InMemoryApplicationRepository::new();
        repo.insert_application(ApplicationModel::new(
            "dashboard".to_string(),
            "test_key".to_string(),
            true,
        ));

        assert!(repo.find_application_by_key("other_key").await.unwrap().is_none());
    }
}
