//! Phone sign-in flow.
//!
//! A two-step state machine: collect a phone number and request a code, then
//! collect the code and exchange it for an identity. Closing the flow at any
//! point resets it, so no state leaks into the next sign-in attempt.

use crate::{
    auth::{AuthError, gateway::AuthGateway},
    session::Identity,
};

/// Country code prefixed to bare national numbers.
pub const DEFAULT_COUNTRY_CODE: &str = "+1";

const CODE_LEN: usize = 6;

/// Current step of the sign-in flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInStep {
    /// Waiting for a phone number.
    AwaitingPhone,
    /// A code was sent to `phone`; waiting for it to be entered.
    AwaitingCode {
        /// The normalized number the code was sent to.
        phone: String,
    },
}

/// Sign-in state machine.
#[derive(Debug)]
pub struct SignInFlow {
    step: SignInStep,
    country_code: String,
}

impl Default for SignInFlow {
    fn default() -> Self {
        SignInFlow::new()
    }
}

impl SignInFlow {
    /// Create a flow using the default country code.
    #[must_use]
    pub fn new() -> Self {
        Self::with_country_code(DEFAULT_COUNTRY_CODE)
    }

    /// Create a flow prefixing bare numbers with the given country code.
    #[must_use]
    pub fn with_country_code(country_code: impl Into<String>) -> Self {
        SignInFlow {
            step: SignInStep::AwaitingPhone,
            country_code: country_code.into(),
        }
    }

    /// The current step.
    pub fn step(&self) -> &SignInStep {
        &self.step
    }

    /// Normalize a raw phone input.
    ///
    /// A number with a leading `+` is taken verbatim; otherwise all
    /// non-digits are stripped and the configured country code is prefixed.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingPhone`] when no digits remain.
    pub fn normalize_phone(&self, raw: &str) -> Result<String, AuthError> {
        let raw = raw.trim();

        if raw.starts_with('+') {
            return Ok(raw.to_string());
        }

        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

        if digits.is_empty() {
            return Err(AuthError::MissingPhone);
        }

        Ok(format!("{}{digits}", self.country_code))
    }

    /// Request a one-time code for the given phone number.
    ///
    /// Transitions to [`SignInStep::AwaitingCode`] on success; stays in
    /// [`SignInStep::AwaitingPhone`] on failure so the user can correct the
    /// number and retry.
    ///
    /// # Errors
    ///
    /// Returns an error when the number is empty or the gateway rejects the
    /// request.
    pub async fn submit_phone(
        &mut self,
        gateway: &dyn AuthGateway,
        raw: &str,
    ) -> Result<(), AuthError> {
        let phone = self.normalize_phone(raw)?;

        gateway.request_code(&phone).await?;

        self.step = SignInStep::AwaitingCode { phone };

        Ok(())
    }

    /// Verify the entered code and produce an identity.
    ///
    /// The code must be exactly six ASCII digits; anything else is rejected
    /// locally without a gateway call. On gateway failure the flow stays in
    /// [`SignInStep::AwaitingCode`] for another attempt; on success the flow
    /// resets for the next use.
    ///
    /// # Errors
    ///
    /// Returns an error when no code was requested, the code is malformed,
    /// or the gateway rejects it.
    pub async fn submit_code(
        &mut self,
        gateway: &dyn AuthGateway,
        code: &str,
    ) -> Result<Identity, AuthError> {
        let SignInStep::AwaitingCode { phone } = &self.step else {
            return Err(AuthError::NotAwaitingCode);
        };

        if code.len() != CODE_LEN || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(AuthError::InvalidCode);
        }

        let identity = gateway.verify_code(phone, code).await?;

        self.reset();

        Ok(identity)
    }

    /// Go back to entering a phone number, discarding the pending code.
    pub fn change_phone(&mut self) {
        self.step = SignInStep::AwaitingPhone;
    }

    /// Reset the flow to its initial state. Called when the user closes the
    /// sign-in surface at any step.
    pub fn reset(&mut self) {
        self.step = SignInStep::AwaitingPhone;
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::auth::gateway::MockAuthGateway;

    use super::*;

    fn identity_for(phone: &str) -> Identity {
        Identity {
            id: Uuid::now_v7(),
            phone: phone.to_string(),
        }
    }

    #[test]
    fn normalize_keeps_numbers_with_leading_plus() -> TestResult {
        let flow = SignInFlow::new();

        assert_eq!(flow.normalize_phone("+447700900123")?, "+447700900123");

        Ok(())
    }

    #[test]
    fn normalize_strips_punctuation_and_prefixes_country_code() -> TestResult {
        let flow = SignInFlow::new();

        assert_eq!(flow.normalize_phone("(555) 123-4567")?, "+15551234567");

        Ok(())
    }

    #[test]
    fn normalize_respects_configured_country_code() -> TestResult {
        let flow = SignInFlow::with_country_code("+44");

        assert_eq!(flow.normalize_phone("7700 900123")?, "+447700900123");

        Ok(())
    }

    #[test]
    fn normalize_rejects_empty_input() {
        let flow = SignInFlow::new();

        assert!(matches!(
            flow.normalize_phone("   "),
            Err(AuthError::MissingPhone)
        ));
    }

    #[tokio::test]
    async fn submit_phone_requests_code_and_advances() -> TestResult {
        let mut gateway = MockAuthGateway::new();
        gateway
            .expect_request_code()
            .with(eq("+15551234567"))
            .once()
            .returning(|_| Ok(()));

        let mut flow = SignInFlow::new();
        flow.submit_phone(&gateway, "555-123-4567").await?;

        assert_eq!(
            flow.step(),
            &SignInStep::AwaitingCode {
                phone: "+15551234567".to_string()
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn submit_phone_failure_stays_on_phone_step() {
        let mut gateway = MockAuthGateway::new();
        gateway.expect_request_code().once().returning(|_| {
            Err(crate::auth::AuthGatewayError::UnexpectedResponse(
                "provider down".to_string(),
            ))
        });

        let mut flow = SignInFlow::new();
        let result = flow.submit_phone(&gateway, "5551234567").await;

        assert!(result.is_err(), "expected gateway error");
        assert_eq!(flow.step(), &SignInStep::AwaitingPhone);
    }

    #[tokio::test]
    async fn submit_code_verifies_and_resets_the_flow() -> TestResult {
        let mut gateway = MockAuthGateway::new();
        gateway.expect_request_code().returning(|_| Ok(()));
        gateway
            .expect_verify_code()
            .with(eq("+15551234567"), eq("123456"))
            .once()
            .returning(|phone, _| Ok(identity_for(phone)));

        let mut flow = SignInFlow::new();
        flow.submit_phone(&gateway, "5551234567").await?;

        let identity = flow.submit_code(&gateway, "123456").await?;

        assert_eq!(identity.phone, "+15551234567");
        assert_eq!(flow.step(), &SignInStep::AwaitingPhone);

        Ok(())
    }

    #[tokio::test]
    async fn malformed_code_is_rejected_without_a_gateway_call() -> TestResult {
        let mut gateway = MockAuthGateway::new();
        gateway.expect_request_code().returning(|_| Ok(()));

        let mut flow = SignInFlow::new();
        flow.submit_phone(&gateway, "5551234567").await?;

        for code in ["12345", "1234567", "12345a", ""] {
            let result = flow.submit_code(&gateway, code).await;
            assert!(
                matches!(result, Err(AuthError::InvalidCode)),
                "expected InvalidCode for {code:?}"
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn submit_code_before_requesting_one_is_rejected() {
        let gateway = MockAuthGateway::new();

        let mut flow = SignInFlow::new();
        let result = flow.submit_code(&gateway, "123456").await;

        assert!(matches!(result, Err(AuthError::NotAwaitingCode)));
    }

    #[tokio::test]
    async fn failed_verification_stays_on_code_step() -> TestResult {
        let mut gateway = MockAuthGateway::new();
        gateway.expect_request_code().returning(|_| Ok(()));
        gateway
            .expect_verify_code()
            .once()
            .returning(|_, _| Err(crate::auth::AuthGatewayError::CodeRejected));

        let mut flow = SignInFlow::new();
        flow.submit_phone(&gateway, "5551234567").await?;

        let result = flow.submit_code(&gateway, "000000").await;

        assert!(result.is_err(), "expected rejected code");
        assert!(matches!(flow.step(), SignInStep::AwaitingCode { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn change_phone_discards_pending_code_state() -> TestResult {
        let mut gateway = MockAuthGateway::new();
        gateway.expect_request_code().returning(|_| Ok(()));

        let mut flow = SignInFlow::new();
        flow.submit_phone(&gateway, "5551234567").await?;

        flow.change_phone();

        assert_eq!(flow.step(), &SignInStep::AwaitingPhone);

        Ok(())
    }

    #[tokio::test]
    async fn reset_leaks_no_state_across_opens() -> TestResult {
        let mut gateway = MockAuthGateway::new();
        gateway.expect_request_code().returning(|_| Ok(()));

        let mut flow = SignInFlow::new();
        flow.submit_phone(&gateway, "5551234567").await?;

        flow.reset();

        assert_eq!(flow.step(), &SignInStep::AwaitingPhone);
        assert!(matches!(
            flow.submit_code(&gateway, "123456").await,
            Err(AuthError::NotAwaitingCode)
        ));

        Ok(())
    }
}
