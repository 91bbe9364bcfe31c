//! Per-request login failures and their HTTP rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::{debug, warn};

use super::types::{FailureBody, FieldErrors};

pub const FIELD_VALIDATION_MESSAGE: &str = "Please correct the errors below";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";
pub const TRANSPORT_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Failure talking to the authentication backend.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("auth backend request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("auth backend returned a malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("{}", FIELD_VALIDATION_MESSAGE)]
    FieldValidation(FieldErrors),
    #[error("{0}")]
    InvalidCredentials(String),
    #[error("{}", TRANSPORT_ERROR_MESSAGE)]
    Transport(#[source] ExchangeError),
}

impl LoginError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::FieldValidation(_) | Self::InvalidCredentials(_) => StatusCode::BAD_REQUEST,
            Self::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::FieldValidation(_) => "field_validation",
            Self::InvalidCredentials(_) => "invalid_credentials",
            Self::Transport(_) => "transport_error",
        }
    }
}

/// A failed login together with the fields echoed back to the form.
#[derive(Debug)]
pub struct LoginFailure {
    pub error: LoginError,
    pub email: Option<String>,
    pub remember_me: bool,
}

impl LoginFailure {
    #[must_use]
    pub fn new(error: LoginError, email: Option<String>, remember_me: bool) -> Self {
        Self {
            error,
            email,
            remember_me,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.error.status()
    }

    #[must_use]
    pub fn body(&self) -> FailureBody {
        let field_errors = match &self.error {
            LoginError::FieldValidation(errors) => Some(errors.clone()),
            _ => None,
        };

        FailureBody {
            email: self.email.clone(),
            remember_me: self.remember_me,
            field_errors,
            error: self.error.to_string(),
        }
    }
}

impl IntoResponse for LoginFailure {
    fn into_response(self) -> Response {
        match &self.error {
            LoginError::Transport(source) => warn!(kind = self.error.kind(), "Login failed: {source}"),
            other => debug!(kind = other.kind(), "Login rejected: {other}"),
        }

        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            LoginError::FieldValidation(FieldErrors::default()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            LoginError::InvalidCredentials("bad creds".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            LoginError::Transport(ExchangeError::MalformedResponse("x".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn display_uses_shared_messages() {
        assert_eq!(
            LoginError::FieldValidation(FieldErrors::default()).to_string(),
            FIELD_VALIDATION_MESSAGE
        );
        assert_eq!(
            LoginError::Transport(ExchangeError::MalformedResponse("x".to_string())).to_string(),
            TRANSPORT_ERROR_MESSAGE
        );
        assert_eq!(
            LoginError::InvalidCredentials(INVALID_CREDENTIALS_MESSAGE.to_string()).to_string(),
            INVALID_CREDENTIALS_MESSAGE
        );
    }

    #[test]
    fn transport_failure_hides_source_details() {
        let failure = LoginFailure::new(
            LoginError::Transport(ExchangeError::MalformedResponse(
                "missing token".to_string(),
            )),
            Some("a@example.com".to_string()),
            true,
        );
        let body = failure.body();
        assert_eq!(body.error, TRANSPORT_ERROR_MESSAGE);
        assert_eq!(body.email.as_deref(), Some("a@example.com"));
        assert!(body.remember_me);
        assert!(body.field_errors.is_none());
    }

    #[test]
    fn field_validation_carries_field_errors() {
        let errors = FieldErrors {
            email: Some("Email is required".to_string()),
            password: None,
        };
        let failure = LoginFailure::new(LoginError::FieldValidation(errors.clone()), None, false);
        let body = failure.body();
        assert_eq!(body.error, FIELD_VALIDATION_MESSAGE);
        assert_eq!(body.field_errors, Some(errors));
    }
}
