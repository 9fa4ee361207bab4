//! Percolate
//!
//! Pure domain logic for the Percolate storefront: the session cart and its
//! derived totals, money formatting, order status transitions and the role
//! hierarchy.

pub mod cart;
pub mod money;
pub mod role;
pub mod status;
