//! OTP login state machine.
//!
//! Drives a single login attempt through phone entry, OTP verification and
//! hand-off into the session. The machine never enforces an attempt ceiling;
//! the backend owns that policy.

use thiserror::Error;
use tracing::info;

use crate::api::types::{SendOtpRequest, VerifyOtpRequest, VerifyOtpResponse};
use crate::api::{ApiError, Gateway};
use crate::nav::Route;
use crate::session::{SessionController, SessionError};

/// Where the login attempt currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStep {
    /// Collecting the phone number.
    Phone,
    /// An OTP has been sent; collecting the code.
    OtpPending,
    /// Verification succeeded and the session took over. Terminal.
    Verified,
}

/// Login operation failure. Variants carry user-facing messages.
#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Enter phone number")]
    EmptyPhone,

    #[error("Enter the OTP")]
    EmptyCode,

    #[error("A request is already in progress")]
    RequestInFlight,

    #[error("this step does not accept that action")]
    InvalidStep,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{0}")]
    Session(String),
}

/// A single login attempt.
pub struct OtpLogin {
    step: LoginStep,
    phone: String,
    attempt_count: u32,
    in_flight: bool,
}

impl OtpLogin {
    pub fn new() -> Self {
        Self {
            step: LoginStep::Phone,
            phone: String::new(),
            attempt_count: 0,
            in_flight: false,
        }
    }

    pub fn step(&self) -> LoginStep {
        self.step
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Failed verification attempts so far.
    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    /// Requests an OTP for `phone`. Valid only while collecting the phone.
    ///
    /// On success the machine advances to OTP entry; on failure it stays put
    /// and the attempt is retryable.
    ///
    /// # Errors
    /// Rejects empty phones, calls from the wrong step and overlapping
    /// requests; otherwise returns the classified API failure.
    pub async fn request_otp(&mut self, gateway: &Gateway, phone: &str) -> Result<(), LoginError> {
        if self.step != LoginStep::Phone {
            return Err(LoginError::InvalidStep);
        }
        let phone = phone.trim();
        if phone.is_empty() {
            return Err(LoginError::EmptyPhone);
        }
        let guard = self.begin_request()?;

        let result: Result<serde_json::Value, ApiError> = gateway
            .post_json("/send-otp", &SendOtpRequest { phone }, None)
            .await;
        guard.finish(self);

        result?;
        self.phone = phone.to_string();
        self.step = LoginStep::OtpPending;
        info!(phone, "otp sent");
        Ok(())
    }

    /// Verifies the entered code. Valid only while an OTP is pending.
    ///
    /// On success the token and user fold into the session and the machine
    /// terminates; the returned route is where the app goes next. On failure
    /// the machine stays in OTP entry with the attempt counted.
    ///
    /// # Errors
    /// Rejects empty codes, calls from the wrong step and overlapping
    /// requests; API failures count as a failed attempt.
    pub async fn verify_otp(
        &mut self,
        gateway: &Gateway,
        session: &SessionController,
        code: &str,
    ) -> Result<Route, LoginError> {
        if self.step != LoginStep::OtpPending {
            return Err(LoginError::InvalidStep);
        }
        let code = code.trim();
        if code.is_empty() {
            return Err(LoginError::EmptyCode);
        }
        let guard = self.begin_request()?;

        let result: Result<VerifyOtpResponse, ApiError> = gateway
            .post_json(
                "/verify-otp",
                &VerifyOtpRequest {
                    phone: &self.phone,
                    code,
                },
                None,
            )
            .await;
        guard.finish(self);

        let verified = match result {
            Ok(verified) => verified,
            Err(e) => {
                self.attempt_count += 1;
                return Err(e.into());
            }
        };

        let route = session.complete_login(verified).map_err(|e| match e {
            SessionError::Api(api) => LoginError::Api(api),
            other => LoginError::Session(other.to_string()),
        })?;
        self.step = LoginStep::Verified;
        Ok(route)
    }

    /// Abandons the pending OTP and returns to phone entry.
    pub fn change_phone(&mut self) {
        if self.step == LoginStep::OtpPending {
            self.step = LoginStep::Phone;
            self.phone.clear();
            self.attempt_count = 0;
        }
    }

    fn begin_request(&mut self) -> Result<RequestGuard, LoginError> {
        if self.in_flight {
            return Err(LoginError::RequestInFlight);
        }
        self.in_flight = true;
        Ok(RequestGuard)
    }
}

impl Default for OtpLogin {
    fn default() -> Self {
        Self::new()
    }
}

// Not a Drop guard: the machine is &mut through the await, so the flag is
// released explicitly on both outcomes.
struct RequestGuard;

impl RequestGuard {
    fn finish(self, machine: &mut OtpLogin) {
        machine.in_flight = false;
    }
}
