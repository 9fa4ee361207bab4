//! Catalogue service.

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::{
    database::Db,
    domain::catalogue::{
        errors::CatalogueServiceError,
        models::{Category, NewProduct, Product, ProductFilter, ProductUpdate},
        repository::PgCatalogueRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogueService {
    db: Db,
    repository: PgCatalogueRepository,
}

impl PgCatalogueService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogueRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogueService for PgCatalogueService {
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogueServiceError> {
        let mut tx = self.db.begin().await?;

        let categories = self.repository.list_categories(&mut tx).await?;

        tx.commit().await?;

        Ok(categories)
    }

    async fn list_products(
        &self,
        filter: ProductFilter,
    ) -> Result<Vec<Product>, CatalogueServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self.repository.list_products(&mut tx, &filter).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(&self, product: Uuid) -> Result<Product, CatalogueServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<Product, CatalogueServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_product(
        &self,
        product: Uuid,
        update: ProductUpdate,
    ) -> Result<Product, CatalogueServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_product(&mut tx, product, update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn set_availability(
        &self,
        product: Uuid,
        is_available: bool,
    ) -> Result<(), CatalogueServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .repository
            .set_availability(&mut tx, product, is_available)
            .await?;

        if rows_affected == 0 {
            return Err(CatalogueServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn delete_product(&self, product: Uuid) -> Result<(), CatalogueServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(CatalogueServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CatalogueService: Send + Sync {
    /// List all categories in display order.
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogueServiceError>;

    /// List available products, optionally filtered by category and search
    /// text.
    async fn list_products(
        &self,
        filter: ProductFilter,
    ) -> Result<Vec<Product>, CatalogueServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: Uuid) -> Result<Product, CatalogueServiceError>;

    /// Create a new product.
    async fn create_product(&self, product: NewProduct)
    -> Result<Product, CatalogueServiceError>;

    /// Update an existing product's details.
    async fn update_product(
        &self,
        product: Uuid,
        update: ProductUpdate,
    ) -> Result<Product, CatalogueServiceError>;

    /// Show or hide a product from the storefront.
    async fn set_availability(
        &self,
        product: Uuid,
        is_available: bool,
    ) -> Result<(), CatalogueServiceError>;

    /// Delete a product.
    async fn delete_product(&self, product: Uuid) -> Result<(), CatalogueServiceError>;
}
