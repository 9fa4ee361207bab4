//! OTP gateway client.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use serde::Deserialize;
use uuid::Uuid;

use crate::{auth::AuthGatewayError, session::Identity};

/// External phone challenge/response provider.
///
/// Consumed, not reimplemented: the core never inspects the identity beyond
/// its `id` and `phone` fields.
#[automock]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Send a one-time code to the given E.164-like phone number.
    async fn request_code(&self, phone: &str) -> Result<(), AuthGatewayError>;

    /// Verify a previously requested code and return the identity it proves.
    async fn verify_code(&self, phone: &str, code: &str) -> Result<Identity, AuthGatewayError>;
}

/// Configuration for connecting to the OTP provider.
#[derive(Debug, Clone)]
pub struct OtpConfig {
    /// Provider base address, e.g. `"https://otp.example.com"`.
    pub addr: String,

    /// API key sent with every request.
    pub api_key: String,
}

/// HTTP client for the OTP provider.
#[derive(Debug, Clone)]
pub struct OtpClient {
    config: OtpConfig,
    http: Client,
}

impl OtpClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: OtpConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl AuthGateway for OtpClient {
    async fn request_code(&self, phone: &str) -> Result<(), AuthGatewayError> {
        let url = format!("{}/v1/otp/send", self.config.addr);

        let body = serde_json::json!({ "phone": phone });

        let response = self
            .http
            .post(&url)
            .header("X-Api-Key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(AuthGatewayError::UnexpectedResponse(format!(
                "send request failed with status {status}: {text}"
            )));
        }

        Ok(())
    }

    async fn verify_code(&self, phone: &str, code: &str) -> Result<Identity, AuthGatewayError> {
        let url = format!("{}/v1/otp/verify", self.config.addr);

        let body = serde_json::json!({ "phone": phone, "code": code });

        let response = self
            .http
            .post(&url)
            .header("X-Api-Key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(AuthGatewayError::UnexpectedResponse(format!(
                "verify request failed with status {status}: {text}"
            )));
        }

        let parsed: VerifyResponse = response.json().await?;

        if !parsed.valid {
            return Err(AuthGatewayError::CodeRejected);
        }

        let user_id = parsed.user_id.ok_or_else(|| {
            AuthGatewayError::UnexpectedResponse("verify response missing user_id".to_string())
        })?;

        Ok(Identity {
            id: user_id,
            phone: phone.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    valid: bool,
    user_id: Option<Uuid>,
}
