//! Orders service.
//!
//! The admin read/update path: listing, detail with line items, status
//! transitions and dashboard counters. Status changes are validated against
//! the transition graph in `percolate-core` before anything is written.

use async_trait::async_trait;
use mockall::automock;
use percolate_core::status::OrderStatus;
use tracing::info;
use uuid::Uuid;

use crate::{
    database::Db,
    domain::orders::{
        errors::OrdersServiceError,
        models::{Order, OrderStats, OrderWithLines},
        repositories::{PgOrderLinesRepository, PgOrdersRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders_repository: PgOrdersRepository,
    lines_repository: PgOrderLinesRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders_repository: PgOrdersRepository::new(),
            lines_repository: PgOrderLinesRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn list_orders(
        &self,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self.orders_repository.list_orders(&mut tx, status).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn get_order(&self, order: Uuid) -> Result<OrderWithLines, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.orders_repository.get_order(&mut tx, order).await?;

        let lines = self.lines_repository.get_order_lines(&mut tx, order).await?;

        tx.commit().await?;

        Ok(OrderWithLines {
            order: record,
            lines,
        })
    }

    async fn update_status(
        &self,
        order: Uuid,
        next: OrderStatus,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.orders_repository.get_order(&mut tx, order).await?;

        if !current.status.can_transition_to(next) {
            return Err(OrdersServiceError::IllegalTransition {
                from: current.status,
                to: next,
            });
        }

        let updated = self
            .orders_repository
            .update_status(&mut tx, order, next)
            .await?;

        tx.commit().await?;

        info!(order_id = %order, from = %current.status, to = %next, "order status updated");

        Ok(updated)
    }

    async fn stats(&self) -> Result<OrderStats, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let stats = self.orders_repository.stats(&mut tx).await?;

        tx.commit().await?;

        Ok(stats)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// List orders, newest first, optionally filtered by status.
    async fn list_orders(
        &self,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, OrdersServiceError>;

    /// Retrieve a single order with its line items.
    async fn get_order(&self, order: Uuid) -> Result<OrderWithLines, OrdersServiceError>;

    /// Move an order to a new status, enforcing the transition graph.
    async fn update_status(
        &self,
        order: Uuid,
        next: OrderStatus,
    ) -> Result<Order, OrdersServiceError>;

    /// Counts per status and gross revenue, for the admin dashboard.
    async fn stats(&self) -> Result<OrderStats, OrdersServiceError>;
}
