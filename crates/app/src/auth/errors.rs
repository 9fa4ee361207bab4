//! Auth errors.

use thiserror::Error;

/// Errors surfaced by the sign-in flow.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("phone number is required")]
    MissingPhone,

    #[error("verification code must be 6 digits")]
    InvalidCode,

    #[error("no verification code has been requested")]
    NotAwaitingCode,

    #[error(transparent)]
    Gateway(#[from] AuthGatewayError),
}

/// Errors from the external OTP provider.
#[derive(Debug, Error)]
pub enum AuthGatewayError {
    #[error("http transport error")]
    Http(#[from] reqwest::Error),

    #[error("unexpected provider response: {0}")]
    UnexpectedResponse(String),

    #[error("verification code rejected")]
    CodeRejected,
}
