//! Catalogue

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::CatalogueServiceError;
pub use service::*;
