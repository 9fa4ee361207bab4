//! Durable order storage.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::orders::{
        models::{NewOrder, NewOrderLine, Order},
        repositories::{PgOrderLinesRepository, PgOrdersRepository},
    },
};

/// The two-write surface the checkout protocol submits through.
///
/// The two calls are deliberately separate: phase 1 persists the order,
/// phase 2 persists its lines using the id phase 1 produced. A phase 2
/// failure therefore leaves the order in place with no lines; the protocol
/// surfaces that instead of rolling back.
#[automock]
#[async_trait]
pub trait OrderStorage: Send + Sync {
    /// Insert a single order record and return the stored row.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, sqlx::Error>;

    /// Insert all line items for an order as one batched write.
    async fn insert_order_lines(&self, lines: Vec<NewOrderLine>) -> Result<(), sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct PgOrderStorage {
    db: Db,
    orders: PgOrdersRepository,
    lines: PgOrderLinesRepository,
}

impl PgOrderStorage {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            lines: PgOrderLinesRepository::new(),
        }
    }
}

#[async_trait]
impl OrderStorage for PgOrderStorage {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        let created = self.orders.create_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn insert_order_lines(&self, lines: Vec<NewOrderLine>) -> Result<(), sqlx::Error> {
        let mut tx = self.db.begin().await?;

        self.lines.create_order_lines(&mut tx, &lines).await?;

        tx.commit().await?;

        Ok(())
    }
}
