//! Order submission.
//!
//! Converts a session cart snapshot into a durable order plus line items via
//! a two-phase write. Phase 1 inserts the order; phase 2 inserts its lines
//! using the id phase 1 produced. A phase 2 failure leaves a durable order
//! with no lines; that orphan is surfaced to the caller and logged, never
//! rolled back silently, and the cart is preserved so the customer loses
//! nothing.

use std::{fmt, sync::Arc, time::Duration};

use percolate_core::{cart::LineItem, money::format_usd, status::OrderStatus};
use rust_decimal::Decimal;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    domain::orders::{
        models::{NewOrder, NewOrderLine, Order},
        storage::OrderStorage,
    },
    session::{Identity, Session, SubmissionState},
};

/// How long each write phase may run before it is abandoned.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(30);

/// Which write phase an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePhase {
    /// Phase 1: the order record insert.
    Order,
    /// Phase 2: the batched order lines insert.
    OrderLines,
}

impl fmt::Display for WritePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WritePhase::Order => f.write_str("order write"),
            WritePhase::OrderLines => f.write_str("order lines write"),
        }
    }
}

/// Errors surfaced by [`CheckoutService::submit`].
///
/// None of these are fatal: every failure returns the session to idle so
/// the customer can correct the input or retry. The one condition retrying
/// does not repair is [`OrderLinesWriteFailed`](CheckoutError::OrderLinesWriteFailed):
/// the named order already exists durably with no lines, and a retry would
/// create a second order rather than fix the first.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Customer name was missing or blank. Rejected before any write.
    #[error("customer name is required")]
    InvalidInput,

    /// No identity on the session. Rejected before any write.
    #[error("sign in before placing an order")]
    Unauthenticated,

    /// Nothing in the cart. Rejected before any write.
    #[error("cart is empty")]
    EmptyCart,

    /// Another submission is in flight for this session.
    #[error("a submission is already in flight")]
    SubmissionInFlight,

    /// Phase 1 failed. Nothing was persisted; safe to retry identically.
    #[error("order write failed")]
    OrderWriteFailed(#[source] sqlx::Error),

    /// Phase 2 failed after phase 1 succeeded. The order exists with no
    /// lines.
    #[error("order lines write failed; order {order_id} has no line items")]
    OrderLinesWriteFailed {
        order_id: Uuid,
        #[source]
        source: sqlx::Error,
    },

    /// A write phase ran past the configured deadline.
    #[error("{phase} timed out")]
    Timeout { phase: WritePhase },
}

/// Customer-supplied fields for one submission attempt.
///
/// The caller keeps the form on failure so the customer can retry without
/// re-entering anything.
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub notes: Option<String>,
}

impl CheckoutForm {
    /// Trim the name and drop blank notes. `None` when the name is empty.
    fn normalized(&self) -> Option<(String, Option<String>)> {
        let name = self.customer_name.trim();

        if name.is_empty() {
            return None;
        }

        let notes = self
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
            .map(str::to_string);

        Some((name.to_string(), notes))
    }
}

/// Confirmation handed back to the caller on success.
#[derive(Debug, Clone)]
pub struct OrderReceipt {
    pub order: Order,
    /// The order total formatted for the confirmation message, e.g. `$9.00`.
    pub formatted_total: String,
}

/// The two-phase order submission protocol.
#[derive(Clone)]
pub struct CheckoutService {
    storage: Arc<dyn OrderStorage>,
    write_timeout: Duration,
}

impl fmt::Debug for CheckoutService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutService")
            .field("write_timeout", &self.write_timeout)
            .finish_non_exhaustive()
    }
}

impl CheckoutService {
    #[must_use]
    pub fn new(storage: Arc<dyn OrderStorage>) -> Self {
        Self {
            storage,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }

    /// Override the per-phase write deadline.
    #[must_use]
    pub fn with_write_timeout(mut self, write_timeout: Duration) -> Self {
        self.write_timeout = write_timeout;
        self
    }

    /// Submit the session's cart as a durable order.
    ///
    /// Preconditions are checked before any write: no submission already in
    /// flight, an identity present, a non-empty cart, a non-blank customer
    /// name. The cart is snapshotted synchronously before phase 1, so
    /// mutations racing the submission cannot change what is written. On
    /// success the cart is cleared; on any failure it is left untouched.
    /// The session returns to [`SubmissionState::Idle`] on every outcome.
    ///
    /// # Errors
    ///
    /// See [`CheckoutError`] for the taxonomy and retry semantics.
    pub async fn submit(
        &self,
        session: &mut Session,
        form: &CheckoutForm,
    ) -> Result<OrderReceipt, CheckoutError> {
        if session.submission == SubmissionState::Submitting {
            return Err(CheckoutError::SubmissionInFlight);
        }

        let identity = session
            .identity
            .clone()
            .ok_or(CheckoutError::Unauthenticated)?;

        if session.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let (customer_name, notes) = form.normalized().ok_or(CheckoutError::InvalidInput)?;

        // Snapshot before the first write; the submitted lines never mutate
        // mid-flight.
        let lines = session.cart.snapshot();
        let total = session.cart.total();

        session.submission = SubmissionState::Submitting;

        let result = self
            .write_order(&identity, customer_name, notes, &lines, total)
            .await;

        session.submission = SubmissionState::Idle;

        let receipt = result?;

        session.cart.clear();

        Ok(receipt)
    }

    async fn write_order(
        &self,
        identity: &Identity,
        customer_name: String,
        notes: Option<String>,
        lines: &[LineItem],
        total: Decimal,
    ) -> Result<OrderReceipt, CheckoutError> {
        let new_order = NewOrder {
            id: Uuid::now_v7(),
            user_id: identity.id,
            total_amount: total,
            status: OrderStatus::Pending,
            phone: identity.phone.clone(),
            customer_name,
            notes,
        };

        // Phase 1: the order record. On failure nothing has been persisted.
        let order = timeout(self.write_timeout, self.storage.insert_order(new_order))
            .await
            .map_err(|_elapsed| CheckoutError::Timeout {
                phase: WritePhase::Order,
            })?
            .map_err(CheckoutError::OrderWriteFailed)?;

        let order_lines: Vec<NewOrderLine> = lines
            .iter()
            .map(|line| NewOrderLine {
                id: Uuid::now_v7(),
                order_id: order.id,
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
                line_total: line.line_total(),
            })
            .collect();

        // Phase 2: the lines. From here on the order exists durably.
        match timeout(
            self.write_timeout,
            self.storage.insert_order_lines(order_lines),
        )
        .await
        {
            Err(_elapsed) => {
                error!(
                    order_id = %order.id,
                    "order lines write timed out; order persisted with no line items"
                );

                Err(CheckoutError::Timeout {
                    phase: WritePhase::OrderLines,
                })
            }
            Ok(Err(source)) => {
                error!(
                    order_id = %order.id,
                    "order lines write failed; order persisted with no line items"
                );

                Err(CheckoutError::OrderLinesWriteFailed {
                    order_id: order.id,
                    source,
                })
            }
            Ok(Ok(())) => {
                info!(order_id = %order.id, total = %order.total_amount, "order placed");

                Ok(OrderReceipt {
                    formatted_total: format_usd(order.total_amount),
                    order,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use jiff::Timestamp;
    use testresult::TestResult;

    use crate::domain::orders::storage::MockOrderStorage;

    use super::*;

    fn stored(order: NewOrder) -> Order {
        Order {
            id: order.id,
            user_id: order.user_id,
            total_amount: order.total_amount,
            status: order.status,
            phone: order.phone,
            customer_name: order.customer_name,
            notes: order.notes,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        }
    }

    fn signed_in_session() -> Session {
        let mut session = Session::new();
        session.sign_in(Identity {
            id: Uuid::now_v7(),
            phone: "+15551234567".to_string(),
        });
        session
    }

    fn form(name: &str) -> CheckoutForm {
        CheckoutForm {
            customer_name: name.to_string(),
            notes: None,
        }
    }

    fn coffee_line() -> LineItem {
        LineItem::new(Uuid::now_v7(), "Flat White", Decimal::new(450, 2)).with_quantity(2)
    }

    fn service(storage: MockOrderStorage) -> CheckoutService {
        CheckoutService::new(Arc::new(storage))
    }

    #[tokio::test]
    async fn guest_submission_is_rejected_with_zero_writes() {
        // An unexpected call on the mock panics, so no expectations doubles
        // as a zero-write assertion.
        let storage = MockOrderStorage::new();

        let mut session = Session::new();
        session.cart.add_item(coffee_line());

        let result = service(storage).submit(&mut session, &form("Alice")).await;

        assert!(matches!(result, Err(CheckoutError::Unauthenticated)));
        assert_eq!(session.cart.len(), 1);
    }

    #[tokio::test]
    async fn empty_cart_submission_is_rejected_with_zero_writes() {
        let storage = MockOrderStorage::new();

        let mut session = signed_in_session();

        let result = service(storage).submit(&mut session, &form("Alice")).await;

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }

    #[tokio::test]
    async fn blank_customer_name_is_rejected_with_zero_writes() {
        let storage = MockOrderStorage::new();

        let mut session = signed_in_session();
        session.cart.add_item(coffee_line());

        let result = service(storage).submit(&mut session, &form("   ")).await;

        assert!(matches!(result, Err(CheckoutError::InvalidInput)));
        assert_eq!(session.cart.len(), 1);
    }

    #[tokio::test]
    async fn in_flight_submission_blocks_a_second_attempt() {
        let storage = MockOrderStorage::new();

        let mut session = signed_in_session();
        session.cart.add_item(coffee_line());
        session.submission = SubmissionState::Submitting;

        let result = service(storage).submit(&mut session, &form("Alice")).await;

        assert!(matches!(result, Err(CheckoutError::SubmissionInFlight)));
        // The rejected attempt must not clobber the in-flight one's state.
        assert_eq!(session.submission, SubmissionState::Submitting);
    }

    #[tokio::test]
    async fn successful_submission_writes_order_then_lines_and_clears_cart() -> TestResult {
        let mut storage = MockOrderStorage::new();

        storage
            .expect_insert_order()
            .withf(|order| {
                order.total_amount == Decimal::new(900, 2)
                    && order.status == OrderStatus::Pending
                    && order.customer_name == "Alice"
                    && order.phone == "+15551234567"
                    && order.notes.is_none()
            })
            .once()
            .returning(|order| Ok(stored(order)));

        storage
            .expect_insert_order_lines()
            .withf(|lines| {
                lines.len() == 1
                    && lines[0].quantity == 2
                    && lines[0].unit_price == Decimal::new(450, 2)
                    && lines[0].line_total == Decimal::new(900, 2)
            })
            .once()
            .returning(|_| Ok(()));

        let mut session = signed_in_session();
        session.cart.add_item(coffee_line());

        let receipt = service(storage).submit(&mut session, &form("Alice")).await?;

        assert_eq!(receipt.order.total_amount, Decimal::new(900, 2));
        assert_eq!(receipt.formatted_total, "$9.00");
        assert!(session.cart.is_empty());
        assert_eq!(session.submission, SubmissionState::Idle);

        Ok(())
    }

    #[tokio::test]
    async fn line_totals_sum_to_the_order_total() -> TestResult {
        let mut storage = MockOrderStorage::new();

        let expected_total = Decimal::new(1475, 2); // 2 × 4.50 + 1 × 5.75

        storage
            .expect_insert_order()
            .withf(move |order| order.total_amount == expected_total)
            .once()
            .returning(|order| Ok(stored(order)));

        storage
            .expect_insert_order_lines()
            .withf(move |lines| {
                let sum: Decimal = lines.iter().map(|line| line.line_total).sum();
                lines.len() == 2 && sum == expected_total
            })
            .once()
            .returning(|_| Ok(()));

        let mut session = signed_in_session();
        session.cart.add_item(coffee_line());
        session.cart.add_item(LineItem::new(
            Uuid::now_v7(),
            "Toastie",
            Decimal::new(575, 2),
        ));

        service(storage).submit(&mut session, &form("Alice")).await?;

        Ok(())
    }

    #[tokio::test]
    async fn lines_carry_the_order_id_from_phase_one() -> TestResult {
        let mut storage = MockOrderStorage::new();

        storage
            .expect_insert_order()
            .once()
            .returning(|order| Ok(stored(order)));

        storage
            .expect_insert_order_lines()
            .withf(|lines| {
                let first = &lines[0];
                lines.iter().all(|line| line.order_id == first.order_id)
            })
            .once()
            .returning(|_| Ok(()));

        let mut session = signed_in_session();
        session.cart.add_item(coffee_line());
        session
            .cart
            .add_item(LineItem::new(Uuid::now_v7(), "Scone", Decimal::new(250, 2)));

        service(storage).submit(&mut session, &form("Alice")).await?;

        Ok(())
    }

    #[tokio::test]
    async fn order_write_failure_leaves_cart_untouched_and_skips_phase_two() {
        let mut storage = MockOrderStorage::new();

        storage
            .expect_insert_order()
            .once()
            .returning(|_| Err(sqlx::Error::PoolClosed));
        // No insert_order_lines expectation: a phase 2 call would panic.

        let mut session = signed_in_session();
        session.cart.add_item(coffee_line());

        let result = service(storage).submit(&mut session, &form("Alice")).await;

        assert!(matches!(result, Err(CheckoutError::OrderWriteFailed(_))));
        assert_eq!(session.cart.len(), 1);
        assert_eq!(session.submission, SubmissionState::Idle);
    }

    #[tokio::test]
    async fn lines_write_failure_surfaces_the_orphan_order_and_keeps_the_cart() {
        let mut storage = MockOrderStorage::new();

        storage
            .expect_insert_order()
            .once()
            .returning(|order| Ok(stored(order)));

        storage
            .expect_insert_order_lines()
            .once()
            .returning(|_| Err(sqlx::Error::PoolClosed));

        let mut session = signed_in_session();
        session.cart.add_item(coffee_line());

        let result = service(storage).submit(&mut session, &form("Alice")).await;

        match result {
            Err(CheckoutError::OrderLinesWriteFailed { order_id, .. }) => {
                assert!(!order_id.is_nil(), "orphan order id should be surfaced");
            }
            other => panic!("expected OrderLinesWriteFailed, got {other:?}"),
        }

        // The customer's items are not lost.
        assert_eq!(session.cart.len(), 1);
        assert_eq!(session.submission, SubmissionState::Idle);
    }

    #[tokio::test]
    async fn blank_notes_are_stored_as_none() -> TestResult {
        let mut storage = MockOrderStorage::new();

        storage
            .expect_insert_order()
            .withf(|order| order.notes.is_none())
            .once()
            .returning(|order| Ok(stored(order)));

        storage
            .expect_insert_order_lines()
            .once()
            .returning(|_| Ok(()));

        let mut session = signed_in_session();
        session.cart.add_item(coffee_line());

        let form = CheckoutForm {
            customer_name: "Alice".to_string(),
            notes: Some("   ".to_string()),
        };

        service(storage).submit(&mut session, &form).await?;

        Ok(())
    }

    #[tokio::test]
    async fn customer_name_is_trimmed() -> TestResult {
        let mut storage = MockOrderStorage::new();

        storage
            .expect_insert_order()
            .withf(|order| order.customer_name == "Alice")
            .once()
            .returning(|order| Ok(stored(order)));

        storage
            .expect_insert_order_lines()
            .once()
            .returning(|_| Ok(()));

        let mut session = signed_in_session();
        session.cart.add_item(coffee_line());

        service(storage)
            .submit(&mut session, &form("  Alice  "))
            .await?;

        Ok(())
    }

    struct HangingStorage;

    #[async_trait]
    impl OrderStorage for HangingStorage {
        async fn insert_order(&self, _order: NewOrder) -> Result<Order, sqlx::Error> {
            std::future::pending().await
        }

        async fn insert_order_lines(&self, _lines: Vec<NewOrderLine>) -> Result<(), sqlx::Error> {
            std::future::pending().await
        }
    }

    struct HangingLinesStorage;

    #[async_trait]
    impl OrderStorage for HangingLinesStorage {
        async fn insert_order(&self, order: NewOrder) -> Result<Order, sqlx::Error> {
            Ok(stored(order))
        }

        async fn insert_order_lines(&self, _lines: Vec<NewOrderLine>) -> Result<(), sqlx::Error> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn hung_order_write_times_out_and_returns_the_session_to_idle() {
        let checkout = CheckoutService::new(Arc::new(HangingStorage))
            .with_write_timeout(Duration::from_secs(1));

        let mut session = signed_in_session();
        session.cart.add_item(coffee_line());

        let result = checkout.submit(&mut session, &form("Alice")).await;

        assert!(matches!(
            result,
            Err(CheckoutError::Timeout {
                phase: WritePhase::Order
            })
        ));
        assert_eq!(session.cart.len(), 1);
        assert_eq!(session.submission, SubmissionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_lines_write_times_out_after_the_order_persisted() {
        let checkout = CheckoutService::new(Arc::new(HangingLinesStorage))
            .with_write_timeout(Duration::from_secs(1));

        let mut session = signed_in_session();
        session.cart.add_item(coffee_line());

        let result = checkout.submit(&mut session, &form("Alice")).await;

        assert!(matches!(
            result,
            Err(CheckoutError::Timeout {
                phase: WritePhase::OrderLines
            })
        ));
        // Phase 1 succeeded, so the order exists with no lines; the cart is
        // kept so the customer loses nothing.
        assert_eq!(session.cart.len(), 1);
        assert_eq!(session.submission, SubmissionState::Idle);
    }
}
