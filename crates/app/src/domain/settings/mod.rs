//! Store settings
//!
//! A key/value store for the storefront's display settings (name, address,
//! contact details, opening hours). Keys are fixed by the schema; the admin
//! surface only updates values.

pub mod models;
mod repository;
pub mod service;

pub use service::*;
