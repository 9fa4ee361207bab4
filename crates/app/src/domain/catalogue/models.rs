//! Catalogue Models

use jiff::Timestamp;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Category Model
#[derive(Debug, Clone)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub display_order: i32,
}

/// Product Model
#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub display_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Product Model
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
}

/// Product Update Model
#[derive(Debug, Clone)]
pub struct ProductUpdate {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
}

/// Listing filter: by category, by case-insensitive free text over name and
/// description, or both.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<Uuid>,
    pub search: Option<String>,
}
