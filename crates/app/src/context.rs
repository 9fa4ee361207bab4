//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        catalogue::{CatalogueService, PgCatalogueService},
        orders::{OrdersService, PgOrderStorage, PgOrdersService, checkout::CheckoutService},
        roles::{PgRolesService, RolesService},
        settings::{PgSettingsService, SettingsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub catalogue: Arc<dyn CatalogueService>,
    pub orders: Arc<dyn OrdersService>,
    pub roles: Arc<dyn RolesService>,
    pub settings: Arc<dyn SettingsService>,
    pub checkout: CheckoutService,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        Ok(Self {
            catalogue: Arc::new(PgCatalogueService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone())),
            roles: Arc::new(PgRolesService::new(db.clone())),
            settings: Arc::new(PgSettingsService::new(db.clone())),
            checkout: CheckoutService::new(Arc::new(PgOrderStorage::new(db))),
        })
    }
}
