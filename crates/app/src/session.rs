//! Client session state
//!
//! Each client session exclusively owns its cart, its signed-in identity and
//! its submission guard. The state is passed explicitly to the services that
//! need it, so sessions are independently testable and any number of them
//! can coexist.

use percolate_core::cart::Cart;
use uuid::Uuid;

/// Opaque reference to an authenticated user, produced by the phone
/// sign-in flow. Absence of an identity is the valid "guest" state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub phone: String,
}

/// Lifecycle of one checkout attempt.
///
/// `Submitting` blocks re-entrant submission; the session returns to `Idle`
/// on every outcome, success or failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionState {
    /// No submission in flight.
    #[default]
    Idle,
    /// The two-phase write is running; further submissions are rejected.
    Submitting,
}

/// Per-session mutable state.
#[derive(Debug, Default)]
pub struct Session {
    pub cart: Cart,
    pub identity: Option<Identity>,
    pub submission: SubmissionState,
}

impl Session {
    /// Create a fresh guest session with an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Session::default()
    }

    /// Attach an identity after a completed sign-in.
    pub fn sign_in(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    /// Drop the identity. The cart survives sign-out.
    pub fn sign_out(&mut self) {
        self.identity = None;
    }
}

#[cfg(test)]
mod tests {
    use percolate_core::cart::LineItem;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn new_session_is_guest_and_idle() {
        let session = Session::new();

        assert!(session.identity.is_none());
        assert!(session.cart.is_empty());
        assert_eq!(session.submission, SubmissionState::Idle);
    }

    #[test]
    fn cart_survives_sign_out() {
        let mut session = Session::new();
        session.cart.add_item(LineItem::new(
            Uuid::now_v7(),
            "Espresso",
            Decimal::new(300, 2),
        ));
        session.sign_in(Identity {
            id: Uuid::now_v7(),
            phone: "+15551234567".to_string(),
        });

        session.sign_out();

        assert!(session.identity.is_none());
        assert_eq!(session.cart.len(), 1);
    }
}
