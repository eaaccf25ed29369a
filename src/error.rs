//! HTTP error responses.
//!
//! Handlers return `Result<T, AppError>`; each error maps to a status code
//! and a JSON body `{ "error": .., "fields": .. }`, where `fields` carries
//! per-field validation messages.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::auth::AuthError;
use crate::checkout::CheckoutError;
use crate::domain::aggregates::{CartError, OrderError};
use crate::StorefrontError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] StorefrontError),

    /// No signed-in user.
    #[error("Access restricted: please sign in")]
    Unauthorized,

    #[error("Admin access required")]
    Forbidden,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CheckoutError> for AppError {
    fn from(e: CheckoutError) -> Self { Self::Domain(e.into()) }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self { Self::Domain(e.into()) }
}

impl From<CartError> for AppError {
    fn from(e: CartError) -> Self { Self::Domain(e.into()) }
}

impl From<OrderError> for AppError {
    fn from(e: OrderError) -> Self { Self::Domain(e.into()) }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Domain(err) => match err {
                StorefrontError::ProductNotFound | StorefrontError::OrderNotFound | StorefrontError::Cart(_) => {
                    StatusCode::NOT_FOUND
                }
                StorefrontError::Order(_) => StatusCode::BAD_REQUEST,
                StorefrontError::Checkout(e) => match e {
                    CheckoutError::EmptyCart | CheckoutError::AlreadySubmitting => StatusCode::CONFLICT,
                    CheckoutError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    CheckoutError::Payload(_) | CheckoutError::MissingParam(_) => StatusCode::BAD_REQUEST,
                },
                StorefrontError::Auth(e) => match e {
                    AuthError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    AuthError::InvalidOtp | AuthError::InvalidResetToken => StatusCode::BAD_REQUEST,
                },
                StorefrontError::Catalog(_) | StorefrontError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Domain(StorefrontError::Checkout(CheckoutError::Invalid(e)))
            | Self::Domain(StorefrontError::Auth(AuthError::Invalid(e))) => Some(e),
            _ => None,
        }
    }
}

/// Field name to messages; falls back to the validator code when a rule has
/// no message.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<&'static str, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| e.message.as_ref().map_or_else(|| e.code.to_string(), ToString::to_string))
                .collect();
            (field, messages)
        })
        .collect()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }

        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Domain(StorefrontError::Checkout(CheckoutError::Invalid(_)))
            | Self::Domain(StorefrontError::Auth(AuthError::Invalid(_))) => "Please correct the highlighted fields".to_string(),
            other => other.to_string(),
        };

        let body = match self.validation() {
            Some(errors) => json!({ "error": message, "fields": field_messages(errors) }),
            None => json!({ "error": message }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::from(CheckoutError::EmptyCart).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::from(AuthError::InvalidOtp).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Domain(StorefrontError::ProductNotFound).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_field_messages_fall_back_to_code() {
        let mut errors = ValidationErrors::new();
        errors.add("confirm_password", ValidationError::new("must_match"));
        let mut with_message = ValidationError::new("length");
        with_message.message = Some("city is required".into());
        errors.add("city", with_message);

        let fields = field_messages(&errors);
        assert_eq!(fields["confirm_password"], vec!["must_match"]);
        assert_eq!(fields["city"], vec!["city is required"]);
    }
}
