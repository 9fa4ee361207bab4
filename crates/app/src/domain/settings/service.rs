//! Settings service.
//!
//! Keys are seeded by the schema; only values change at runtime, so there is
//! no create or delete path and updating an unknown key is `NotFound`.

use async_trait::async_trait;
use mockall::automock;
use sqlx::Error;
use thiserror::Error as ThisError;
use tracing::info;

use crate::{
    database::Db,
    domain::settings::{models::Setting, repository::PgSettingsRepository},
};

#[derive(Debug, ThisError)]
pub enum SettingsServiceError {
    #[error("setting not found")]
    NotFound,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for SettingsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        Self::Sql(error)
    }
}

#[derive(Debug, Clone)]
pub struct PgSettingsService {
    db: Db,
    repository: PgSettingsRepository,
}

impl PgSettingsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgSettingsRepository::new(),
        }
    }
}

#[async_trait]
impl SettingsService for PgSettingsService {
    async fn list_settings(&self) -> Result<Vec<Setting>, SettingsServiceError> {
        let mut tx = self.db.begin().await?;

        let settings = self.repository.list_settings(&mut tx).await?;

        tx.commit().await?;

        Ok(settings)
    }

    async fn update_setting(&self, key: &str, value: &str) -> Result<(), SettingsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.update_setting(&mut tx, key, value).await?;

        if rows_affected == 0 {
            return Err(SettingsServiceError::NotFound);
        }

        tx.commit().await?;

        info!(key = %key, "setting updated");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait SettingsService: Send + Sync {
    /// List all settings ordered by key.
    async fn list_settings(&self) -> Result<Vec<Setting>, SettingsServiceError>;

    /// Replace the value of an existing setting.
    async fn update_setting(&self, key: &str, value: &str) -> Result<(), SettingsServiceError>;
}
