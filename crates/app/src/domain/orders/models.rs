//! Order Models

use jiff::Timestamp;
use percolate_core::status::OrderStatus;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Order Model
///
/// Owned by durable storage once inserted; the submission protocol only
/// observes it afterwards.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub phone: String,
    pub customer_name: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Order Model
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub phone: String,
    pub customer_name: String,
    pub notes: Option<String>,
}

/// Order Line Model
///
/// One per cart line item at submission time. `product_name` is joined from
/// the catalogue for display.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// New Order Line Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderLine {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// An order together with its line items.
#[derive(Debug, Clone)]
pub struct OrderWithLines {
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

/// Dashboard counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderStats {
    pub pending: i64,
    pub preparing: i64,
    pub ready: i64,
    pub completed: i64,
    pub cancelled: i64,
    /// Sum of `total_amount` over completed orders.
    pub gross_revenue: Decimal,
}
