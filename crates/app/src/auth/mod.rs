//! Phone authentication
//!
//! Sign-in is a phone challenge/response: the customer supplies a phone
//! number, receives a one-time code from the external OTP provider, and
//! exchanges the code for an [`Identity`](crate::session::Identity).

pub mod errors;
pub mod flow;
pub mod gateway;

pub use errors::{AuthError, AuthGatewayError};
pub use flow::{SignInFlow, SignInStep};
pub use gateway::{AuthGateway, MockAuthGateway, OtpClient, OtpConfig};
