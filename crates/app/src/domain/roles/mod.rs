//! Roles
//!
//! Maps identities to access roles. Used by callers to gate the admin
//! surface; the cart/order core itself enforces no role check.

pub mod models;
mod repository;
pub mod service;

pub use service::*;
