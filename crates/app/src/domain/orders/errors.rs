//! Orders service errors.

use percolate_core::status::OrderStatus;
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order not found")]
    NotFound,

    #[error("order already exists")]
    AlreadyExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("cannot move order from {from} to {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
