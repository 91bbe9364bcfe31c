//! Credential extraction and field validation.

use regex::Regex;
use secrecy::SecretString;

use super::{
    error::{LoginError, LoginFailure},
    gateway::Step,
    types::{FieldErrors, LoginForm, LoginRequest},
};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Basic `local@domain.tld` shape check.
pub(super) fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email))
}

/// Checkbox semantics: only the literal `on` counts as checked.
pub(super) fn remember_me(raw: Option<&str>) -> bool {
    raw == Some("on")
}

/// Evaluate every rule independently so all violations are reported together.
/// Empty values are treated the same as missing ones.
#[must_use]
pub fn field_errors(email: Option<&str>, password: Option<&str>) -> FieldErrors {
    let email = match email.filter(|value| !value.is_empty()) {
        None => Some("Email is required".to_string()),
        Some(value) if !valid_email(value) => {
            Some("Please enter a valid email address".to_string())
        }
        Some(_) => None,
    };

    let password = match password.filter(|value| !value.is_empty()) {
        None => Some("Password is required".to_string()),
        Some(value) if value.chars().count() < MIN_PASSWORD_LENGTH => Some(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )),
        Some(_) => None,
    };

    FieldErrors { email, password }
}

/// Turn the raw form into a [`LoginRequest`], or stop with a field validation failure.
pub(super) fn validate(form: LoginForm) -> Step<LoginRequest> {
    let remember_me = remember_me(form.remember_me.as_deref());
    let errors = field_errors(form.email.as_deref(), form.password.as_deref());

    match (form.email, form.password) {
        (Some(email), Some(password)) if errors.is_empty() => Step::Continue(LoginRequest {
            email,
            password: SecretString::from(password),
            remember_me,
        }),
        (email, _) => Step::Fail(LoginFailure::new(
            LoginError::FieldValidation(errors),
            email,
            remember_me,
        )),
    }
}
