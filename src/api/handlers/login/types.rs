//! Form, query and response payloads for the login endpoints.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::form_urlencoded;
use utoipa::{IntoParams, ToSchema};

/// Raw form submission. Every field is optional so a partial form still reaches validation.
#[derive(ToSchema, Default)]
pub struct LoginForm {
    pub email: Option<String>,
    #[schema(format = Password)]
    pub password: Option<String>,
    /// Checkbox value; only the literal `on` enables a long-lived session.
    #[serde(rename = "rememberMe")]
    pub remember_me: Option<String>,
}

impl LoginForm {
    /// Parse an `application/x-www-form-urlencoded` body. When a key repeats the
    /// first value wins, unknown keys are ignored.
    #[must_use]
    pub fn from_urlencoded(body: &[u8]) -> Self {
        let mut form = Self::default();
        for (key, value) in form_urlencoded::parse(body) {
            let slot = match key.as_ref() {
                "email" => &mut form.email,
                "password" => &mut form.password,
                "rememberMe" => &mut form.remember_me,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        form
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"***")
            .field("remember_me", &self.remember_me)
            .finish()
    }
}

#[derive(IntoParams, Deserialize, Debug, Default, PartialEq, Eq)]
#[into_params(parameter_in = Query)]
pub struct LoginQuery {
    /// Same-origin path to land on after login, defaults to `/dashboard`.
    pub redirect: Option<String>,
}

impl LoginQuery {
    /// Parse a raw query string, keeping the first `redirect` when it repeats.
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        let redirect = raw.and_then(|query| {
            form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == "redirect")
                .map(|(_, value)| value.into_owned())
        });
        Self { redirect }
    }
}

/// Validated credentials, built once per submission.
pub struct LoginRequest {
    pub email: String,
    pub password: SecretString,
    pub remember_me: bool,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .field("remember_me", &self.remember_me)
            .finish()
    }
}

/// Per-field validation messages, serialized in form order.
#[derive(ToSchema, Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl FieldErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

/// Body returned with every failed login so the form can be redisplayed.
#[derive(ToSchema, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FailureBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub remember_me: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<FieldErrors>,
    pub error: String,
}

/// Rendered when no session exists yet; the form itself lives in the frontend.
#[derive(ToSchema, Serialize, Debug, Default)]
pub struct LoginPage {}

/// JSON sent to the authentication backend.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct BackendLoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub remember_me: bool,
}

/// JSON returned by the authentication backend, `token` on success and `message` on failure.
#[derive(Deserialize, Debug, Default)]
pub(super) struct BackendLoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failure_body_uses_camel_case_and_skips_empty() {
        let body = FailureBody {
            email: Some("a@example.com".to_string()),
            remember_me: true,
            field_errors: None,
            error: "Invalid email or password".to_string(),
        };
        let value = serde_json::to_value(&body).ok();
        assert_eq!(
            value,
            Some(json!({
                "email": "a@example.com",
                "rememberMe": true,
                "error": "Invalid email or password"
            }))
        );
    }

    #[test]
    fn field_errors_serialize_email_before_password() {
        let errors = FieldErrors {
            email: Some("Email is required".to_string()),
            password: Some("Password is required".to_string()),
        };
        let text = serde_json::to_string(&errors).unwrap_or_default();
        let email_at = text.find("email");
        let password_at = text.find("password");
        assert!(email_at.is_some() && password_at.is_some());
        assert!(email_at < password_at);
    }

    #[test]
    fn debug_output_redacts_password() {
        let form = LoginForm {
            email: Some("a@example.com".to_string()),
            password: Some("hunter2hunter2".to_string()),
            remember_me: None,
        };
        let request = LoginRequest {
            email: "a@example.com".to_string(),
            password: SecretString::from("hunter2hunter2".to_string()),
            remember_me: false,
        };
        assert!(!format!("{form:?}").contains("hunter2"));
        assert!(!format!("{request:?}").contains("hunter2"));
    }

    #[test]
    fn login_query_keeps_first_redirect() {
        assert_eq!(LoginQuery::from_raw(None), LoginQuery::default());
        assert_eq!(
            LoginQuery::from_raw(Some("redirect=%2Fsettings&redirect=https://evil.com"))
                .redirect
                .as_deref(),
            Some("/settings")
        );
        assert_eq!(LoginQuery::from_raw(Some("next=/x")).redirect, None);
    }

    #[test]
    fn login_form_keeps_first_value_of_repeated_keys() {
        let form = LoginForm::from_urlencoded(
            b"email=a%40example.com&password=correct+horse&rememberMe=off&rememberMe=on&email=b%40example.com&extra=1",
        );
        assert_eq!(form.email.as_deref(), Some("a@example.com"));
        assert_eq!(form.password.as_deref(), Some("correct horse"));
        assert_eq!(form.remember_me.as_deref(), Some("off"));

        let empty = LoginForm::from_urlencoded(b"");
        assert!(empty.email.is_none() && empty.password.is_none() && empty.remember_me.is_none());
    }

    #[test]
    fn backend_response_tolerates_missing_fields() {
        let parsed: Result<BackendLoginResponse, _> = serde_json::from_str("{}");
        assert!(parsed.is_ok());
        if let Ok(parsed) = parsed {
            assert!(parsed.token.is_none());
            assert!(parsed.message.is_none());
        }
    }
}
