//! Roles service.

use async_trait::async_trait;
use mockall::automock;
use percolate_core::role::Role;
use sqlx::Error;
use thiserror::Error as ThisError;
use tracing::info;
use uuid::Uuid;

use crate::{
    database::Db,
    domain::roles::{models::UserRole, repository::PgRolesRepository},
};

#[derive(Debug, ThisError)]
pub enum RolesServiceError {
    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for RolesServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}

#[derive(Debug, Clone)]
pub struct PgRolesService {
    db: Db,
    repository: PgRolesRepository,
}

impl PgRolesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgRolesRepository::new(),
        }
    }
}

#[async_trait]
impl RolesService for PgRolesService {
    async fn get_role(&self, user: Uuid) -> Result<Role, RolesServiceError> {
        let mut tx = self.db.begin().await?;

        let role = self.repository.get_role(&mut tx, user).await?;

        tx.commit().await?;

        // No assignment means a regular customer.
        Ok(role.unwrap_or(Role::User))
    }

    async fn assign_role(&self, user: Uuid, role: Role) -> Result<(), RolesServiceError> {
        let mut tx = self.db.begin().await?;

        self.repository.assign_role(&mut tx, user, role).await?;

        tx.commit().await?;

        info!(user_id = %user, role = %role, "role assigned");

        Ok(())
    }

    async fn list_user_roles(&self) -> Result<Vec<UserRole>, RolesServiceError> {
        let mut tx = self.db.begin().await?;

        let roles = self.repository.list_user_roles(&mut tx).await?;

        tx.commit().await?;

        Ok(roles)
    }
}

#[automock]
#[async_trait]
pub trait RolesService: Send + Sync {
    /// Look up a user's role, defaulting to [`Role::User`] when none is
    /// assigned.
    async fn get_role(&self, user: Uuid) -> Result<Role, RolesServiceError>;

    /// Assign or replace a user's role.
    async fn assign_role(&self, user: Uuid, role: Role) -> Result<(), RolesServiceError>;

    /// List all explicit role assignments, newest first.
    async fn list_user_roles(&self) -> Result<Vec<UserRole>, RolesServiceError>;
}
