//! Percolate Domain Concerns

pub mod catalogue;
pub mod orders;
pub mod roles;
pub mod settings;
