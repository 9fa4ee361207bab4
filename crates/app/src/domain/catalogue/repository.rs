//! Catalogue Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::catalogue::models::{
    Category, NewProduct, Product, ProductFilter, ProductUpdate,
};

const LIST_CATEGORIES_SQL: &str = include_str!("sql/list_categories.sql");
const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const SET_PRODUCT_AVAILABILITY_SQL: &str = include_str!("sql/set_product_availability.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogueRepository;

impl PgCatalogueRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Category>, sqlx::Error> {
        query_as::<Postgres, Category>(LIST_CATEGORIES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, sqlx::Error> {
        query_as::<Postgres, Product>(LIST_PRODUCTS_SQL)
            .bind(filter.category)
            .bind(filter.search.as_deref())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: Uuid,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(product)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: NewProduct,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(CREATE_PRODUCT_SQL)
            .bind(product.id)
            .bind(product.category_id)
            .bind(&product.name)
            .bind(product.description.as_deref())
            .bind(product.price)
            .bind(product.image_url.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: Uuid,
        update: ProductUpdate,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(UPDATE_PRODUCT_SQL)
            .bind(product)
            .bind(&update.name)
            .bind(update.description.as_deref())
            .bind(update.price)
            .bind(update.image_url.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_availability(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: Uuid,
        is_available: bool,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_PRODUCT_AVAILABILITY_SQL)
            .bind(product)
            .bind(is_available)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Category {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            display_order: row.try_get("display_order")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            category_id: row.try_get("category_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: row.try_get::<Decimal, _>("price")?,
            image_url: row.try_get("image_url")?,
            is_available: row.try_get("is_available")?,
            display_order: row.try_get("display_order")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
