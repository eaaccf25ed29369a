//! Mock authentication.
//!
//! Nothing here checks a credential. Signing in stores the email as the
//! session user; the password-reset flow issues a one-time code and a reset
//! token held in memory, each behind a simulated network delay.

use std::collections::HashMap;
use std::time::Duration;

use rand::Rng;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::aggregates::{Role, User};

pub const OTP_DIGITS: usize = 4;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid form: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error("verification code does not match")]
    InvalidOtp,

    #[error("reset token is unknown or already used")]
    InvalidResetToken,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(must_match = "password")]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForgotPasswordForm {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyOtpForm {
    #[validate(email)]
    pub email: String,
    #[validate(custom = "validate_otp")]
    pub code: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordForm {
    pub token: Uuid,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(must_match = "password")]
    pub confirm_password: String,
}

fn validate_otp(code: &str) -> Result<(), ValidationError> {
    if code.len() == OTP_DIGITS && code.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("otp_format"))
    }
}

#[derive(Debug, Default)]
struct ResetState {
    otps: HashMap<String, String>,
    tokens: HashMap<Uuid, String>,
}

#[derive(Debug)]
pub struct AuthService {
    delay: Duration,
    admin_emails: Vec<String>,
    reset: Mutex<ResetState>,
}

impl AuthService {
    pub fn new(delay: Duration, admin_emails: Vec<String>) -> Self {
        let admin_emails = admin_emails.into_iter().map(|e| e.trim().to_lowercase()).collect();
        Self { delay, admin_emails, reset: Mutex::new(ResetState::default()) }
    }

    fn role_for(&self, email: &str) -> Role {
        if self.admin_emails.iter().any(|a| a.eq_ignore_ascii_case(email)) { Role::Admin } else { Role::User }
    }

    /// Builds the session user. Any password is accepted.
    pub fn login(&self, form: &LoginForm) -> Result<User, AuthError> {
        form.validate()?;
        let user = User::new(form.email.trim(), self.role_for(form.email.trim()));
        info!(email = %user.email, role = ?user.role, "signed in");
        Ok(user)
    }

    pub fn signup(&self, form: &SignupForm) -> Result<User, AuthError> {
        form.validate()?;
        let user = User::new(form.email.trim(), self.role_for(form.email.trim())).with_name(form.name.trim());
        info!(email = %user.email, "signed up");
        Ok(user)
    }

    /// Issues a one-time code for the email and returns it. Delivery is
    /// simulated; the caller decides whether to reveal the code.
    pub async fn forgot_password(&self, form: &ForgotPasswordForm) -> Result<String, AuthError> {
        form.validate()?;
        tokio::time::sleep(self.delay).await;
        let code = format!("{:0width$}", rand::thread_rng().gen_range(0..10u32.pow(OTP_DIGITS as u32)), width = OTP_DIGITS);
        self.reset.lock().await.otps.insert(form.email.to_lowercase(), code.clone());
        info!(email = %form.email, "password reset code issued");
        debug!(email = %form.email, %code, "reset code");
        Ok(code)
    }

    /// Consumes a matching code and returns a single-use reset token.
    pub async fn verify_otp(&self, form: &VerifyOtpForm) -> Result<Uuid, AuthError> {
        form.validate()?;
        tokio::time::sleep(self.delay).await;
        let email = form.email.to_lowercase();
        let mut reset = self.reset.lock().await;
        if reset.otps.get(&email) != Some(&form.code) {
            return Err(AuthError::InvalidOtp);
        }
        reset.otps.remove(&email);
        let token = Uuid::new_v4();
        reset.tokens.insert(token, email);
        Ok(token)
    }

    /// Consumes the reset token. Returns the email it was issued for.
    pub async fn reset_password(&self, form: &ResetPasswordForm) -> Result<String, AuthError> {
        form.validate()?;
        tokio::time::sleep(self.delay).await;
        let email = self.reset.lock().await.tokens.remove(&form.token).ok_or(AuthError::InvalidResetToken)?;
        info!(%email, "password reset");
        Ok(email)
    }
}
