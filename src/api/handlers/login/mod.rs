//! `GET /auth/login` and `POST /auth/login`.
//!
//! The handlers only lift cookies, the query and the form out of the request and
//! turn the gateway [`Outcome`] back into a response.

pub mod error;
pub mod exchange;
pub mod gateway;
pub mod redirect;
pub mod session;
pub mod state;
pub mod types;
pub mod validation;

use axum::{
    extract::{rejection::RawFormRejection, Extension, RawForm, RawQuery},
    http::{
        header::{LOCATION, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{debug, error, instrument};

pub use error::{ExchangeError, LoginError, LoginFailure};
pub use exchange::{AuthBackend, AuthResult, ExchangeFuture, HttpAuthBackend};
pub use gateway::{Gateway, LoginContext, Outcome, Phase, Redirect, Step};
pub use redirect::{RedirectGuard, RedirectTarget, DEFAULT_REDIRECT};
pub use session::SessionCookie;
pub use state::{Environment, GatewayConfig};
pub use types::{FailureBody, FieldErrors, LoginForm, LoginPage, LoginQuery, LoginRequest};

#[utoipa::path(
    get,
    path= "/auth/login",
    params(LoginQuery),
    responses (
        (status = 200, description = "No session yet, render the login form", body = LoginPage),
        (status = 302, description = "Session already present, redirect to the resolved target"),
    ),
    tag= "login"
)]
#[instrument(skip_all)]
pub async fn load(
    gateway: Extension<Arc<Gateway>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Outcome {
    let query = LoginQuery::from_raw(query.as_deref());
    let context = LoginContext::from_headers(&headers, query.redirect);
    gateway.load(&context)
}

#[utoipa::path(
    post,
    path= "/auth/login",
    params(LoginQuery),
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses (
        (status = 302, description = "Login successful, session cookie set"),
        (status = 400, description = "Field validation failed or credentials rejected", body = FailureBody),
        (status = 500, description = "Authentication backend unavailable", body = FailureBody),
    ),
    tag= "login"
)]
#[instrument(skip_all)]
pub async fn submit(
    gateway: Extension<Arc<Gateway>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    form: Result<RawForm, RawFormRejection>,
) -> Outcome {
    let form = match form {
        Ok(RawForm(body)) => LoginForm::from_urlencoded(&body),
        Err(rejection) => {
            debug!("Undecodable login form, treating as empty: {rejection}");
            LoginForm::default()
        }
    };

    let query = LoginQuery::from_raw(query.as_deref());
    let context = LoginContext::from_headers(&headers, query.redirect);
    gateway.submit(&context, form).await
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Self::RenderForm => (StatusCode::OK, Json(LoginPage::default())).into_response(),
            Self::Redirect(redirect) => redirect.into_response(),
            Self::Fail(failure) => failure.into_response(),
        }
    }
}

impl IntoResponse for Redirect {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();

        match HeaderValue::from_str(self.location.as_str()) {
            Ok(location) => {
                headers.insert(LOCATION, location);
            }
            Err(err) => {
                error!("Failed to build Location header: {err}");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        }

        if let Some(cookie) = &self.cookie {
            match cookie.to_header_value() {
                Ok(value) => {
                    headers.insert(SET_COOKIE, value);
                }
                Err(err) => {
                    error!("Failed to build session cookie header: {err}");
                    return StatusCode::INTERNAL_SERVER_ERROR.into_response();
                }
            }
        }

        (StatusCode::FOUND, headers).into_response()
    }
}
