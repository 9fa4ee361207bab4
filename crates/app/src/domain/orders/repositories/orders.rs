//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use percolate_core::status::OrderStatus;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::orders::models::{NewOrder, Order, OrderStats};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("../sql/update_order_status.sql");
const ORDER_STATS_SQL: &str = include_str!("../sql/order_stats.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: NewOrder,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(order.id)
            .bind(order.user_id)
            .bind(order.total_amount)
            .bind(order.status.as_str())
            .bind(&order.phone)
            .bind(&order.customer_name)
            .bind(order.notes.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LIST_ORDERS_SQL)
            .bind(status.map(OrderStatus::as_str))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: Uuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: Uuid,
        status: OrderStatus,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(UPDATE_ORDER_STATUS_SQL)
            .bind(order)
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn stats(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<OrderStats, sqlx::Error> {
        let row = query(ORDER_STATS_SQL).fetch_one(&mut **tx).await?;

        Ok(OrderStats {
            pending: row.try_get("pending")?,
            preparing: row.try_get("preparing")?,
            ready: row.try_get("ready")?,
            completed: row.try_get("completed")?,
            cancelled: row.try_get("cancelled")?,
            gross_revenue: row.try_get::<Decimal, _>("gross_revenue")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status = try_get_status(row, "status")?;

        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            total_amount: row.try_get::<Decimal, _>("total_amount")?,
            status,
            phone: row.try_get("phone")?,
            customer_name: row.try_get("customer_name")?,
            notes: row.try_get("notes")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

pub(super) fn try_get_status(row: &PgRow, col: &str) -> Result<OrderStatus, sqlx::Error> {
    let raw: String = row.try_get(col)?;

    raw.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}
