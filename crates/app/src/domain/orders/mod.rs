//! Orders
//!
//! Durable orders and their line items: the checkout submission protocol
//! that creates them, the storage surface it writes through, and the admin
//! service that lists them and moves them through their status lifecycle.

pub mod checkout;
pub mod errors;
pub mod models;
mod repositories;
pub mod service;
pub mod storage;

pub use errors::OrdersServiceError;
pub use service::*;
pub use storage::{MockOrderStorage, OrderStorage, PgOrderStorage};
