//! Order status
//!
//! The lifecycle of a durable order. Only the admin surface moves an order
//! forward; the transition graph is enforced here so that an order cannot be
//! reopened once completed or cancelled.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status of a durable order.
///
/// Orders are created as [`Pending`](OrderStatus::Pending). Legal transitions:
/// `pending → preparing | cancelled`, `preparing → ready | cancelled`,
/// `ready → completed`. `completed` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Received, not yet picked up by staff.
    Pending,
    /// Being prepared.
    Preparing,
    /// Ready for customer pickup.
    Ready,
    /// Picked up and paid.
    Completed,
    /// Cancelled before it was ready.
    Cancelled,
}

impl OrderStatus {
    /// Check whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (
                OrderStatus::Pending,
                OrderStatus::Preparing | OrderStatus::Cancelled
            ) | (
                OrderStatus::Preparing,
                OrderStatus::Ready | OrderStatus::Cancelled
            ) | (OrderStatus::Ready, OrderStatus::Completed)
        )
    }

    /// Check whether no further transitions are possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// The lowercase wire string for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order status: {0}")]
pub struct ParseOrderStatusError(pub String);

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(ParseOrderStatusError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn forward_transitions_are_legal() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Preparing));
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::Ready));
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::Completed));
    }

    #[test]
    fn cancellation_is_legal_until_ready() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Ready.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn terminal_states_admit_no_transitions() {
        for next in [
            OrderStatus::Pending,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert!(!OrderStatus::Completed.can_transition_to(next));
            assert!(!OrderStatus::Cancelled.can_transition_to(next));
        }

        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
    }

    #[test]
    fn completed_orders_cannot_be_reopened() {
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn skipping_preparation_is_illegal() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Ready));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Completed));
    }

    #[test]
    fn round_trips_through_wire_strings() -> TestResult {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>()?, status);
        }

        Ok(())
    }

    #[test]
    fn unknown_status_fails_to_parse() {
        let result = "shipped".parse::<OrderStatus>();

        assert_eq!(result, Err(ParseOrderStatusError("shipped".to_string())));
    }
}
