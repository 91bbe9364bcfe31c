//! Session cookie construction and request cookie lookup.

use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

pub const SESSION_COOKIE_NAME: &str = "auth-token";
pub const CSRF_COOKIE_NAME: &str = "XSRF-TOKEN";

/// Lifetime of a session when "remember me" is checked (30 days).
pub const REMEMBER_ME_MAX_AGE_SECONDS: i64 = 60 * 60 * 24 * 30;
/// Lifetime of a regular session (1 day).
pub const DEFAULT_MAX_AGE_SECONDS: i64 = 60 * 60 * 24;

const COOKIE_PATH: &str = "/";
const COOKIE_SAME_SITE: &str = "Lax";

#[must_use]
pub const fn max_age_seconds(remember_me: bool) -> i64 {
    if remember_me {
        REMEMBER_ME_MAX_AGE_SECONDS
    } else {
        DEFAULT_MAX_AGE_SECONDS
    }
}

/// RFC 6265 `cookie-octet`: visible ASCII except `"`, `,`, `;` and `\`.
#[must_use]
pub fn valid_cookie_value(value: &str) -> bool {
    !value.is_empty()
        && value.bytes().all(|b| {
            matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
        })
}

/// The `auth-token` cookie issued after a successful exchange.
#[derive(Clone)]
pub struct SessionCookie {
    value: SecretString,
    max_age_seconds: i64,
    secure: bool,
}

impl SessionCookie {
    #[must_use]
    pub fn new(token: SecretString, remember_me: bool, secure: bool) -> Self {
        Self {
            value: token,
            max_age_seconds: max_age_seconds(remember_me),
            secure,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        SESSION_COOKIE_NAME
    }

    #[must_use]
    pub fn value(&self) -> &str {
        self.value.expose_secret()
    }

    #[must_use]
    pub const fn path(&self) -> &'static str {
        COOKIE_PATH
    }

    #[must_use]
    pub const fn max_age_seconds(&self) -> i64 {
        self.max_age_seconds
    }

    #[must_use]
    pub const fn http_only(&self) -> bool {
        true
    }

    #[must_use]
    pub const fn secure(&self) -> bool {
        self.secure
    }

    #[must_use]
    pub const fn same_site(&self) -> &'static str {
        COOKIE_SAME_SITE
    }

    /// Serialize into a `Set-Cookie` header value.
    ///
    /// # Errors
    /// Returns an error if the token contains bytes not allowed in a header.
    pub fn to_header_value(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut cookie = format!(
            "{}={}; Path={}; Max-Age={}; HttpOnly; SameSite={}",
            self.name(),
            self.value(),
            self.path(),
            self.max_age_seconds,
            self.same_site()
        );
        // Only mark cookies secure in production deployments.
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
    }
}

impl fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCookie")
            .field("name", &self.name())
            .field("value", &"***")
            .field("path", &self.path())
            .field("max_age_seconds", &self.max_age_seconds)
            .field("http_only", &self.http_only())
            .field("secure", &self.secure)
            .field("same_site", &self.same_site())
            .finish()
    }
}

/// Return the first value of the named cookie across all `Cookie` headers.
#[must_use]
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let mut parts = pair.trim().splitn(2, '=');
            let key = parts.next()?.trim();
            let val = parts.next()?.trim();
            (key == name).then(|| val.trim_matches('"').to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap_or(HeaderValue::from_static("")));
        headers
    }

    #[test]
    fn max_age_depends_on_remember_me() {
        assert_eq!(max_age_seconds(true), 2_592_000);
        assert_eq!(max_age_seconds(false), 86_400);
    }

    #[test]
    fn session_cookie_fields() {
        let cookie = SessionCookie::new(SecretString::from("abc".to_string()), true, false);
        assert_eq!(cookie.name(), "auth-token");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.path(), "/");
        assert_eq!(cookie.max_age_seconds(), 2_592_000);
        assert!(cookie.http_only());
        assert!(!cookie.secure());
        assert_eq!(cookie.same_site(), "Lax");
    }

    #[test]
    fn session_cookie_header_development() {
        let cookie = SessionCookie::new(SecretString::from("abc".to_string()), false, false);
        let header = cookie.to_header_value().ok();
        assert_eq!(
            header.as_ref().and_then(|value| value.to_str().ok()),
            Some("auth-token=abc; Path=/; Max-Age=86400; HttpOnly; SameSite=Lax")
        );
    }

    #[test]
    fn session_cookie_header_production_is_secure() {
        let cookie = SessionCookie::new(SecretString::from("abc".to_string()), true, true);
        let header = cookie.to_header_value().ok();
        assert_eq!(
            header.as_ref().and_then(|value| value.to_str().ok()),
            Some("auth-token=abc; Path=/; Max-Age=2592000; HttpOnly; SameSite=Lax; Secure")
        );
    }

    #[test]
    fn session_cookie_debug_redacts_value() {
        let cookie = SessionCookie::new(SecretString::from("super-secret".to_string()), true, true);
        assert!(!format!("{cookie:?}").contains("super-secret"));
    }

    #[test]
    fn valid_cookie_value_rejects_separators() {
        assert!(valid_cookie_value("abc.DEF-123_~"));
        assert!(valid_cookie_value("eyJhbGciOiJIUzI1NiJ9.e30.sig=="));
        assert!(!valid_cookie_value(""));
        assert!(!valid_cookie_value("a b"));
        assert!(!valid_cookie_value("a;b"));
        assert!(!valid_cookie_value("a,b"));
        assert!(!valid_cookie_value("a\"b"));
        assert!(!valid_cookie_value("a\\b"));
        assert!(!valid_cookie_value("a\r\nSet-Cookie: x=y"));
        assert!(!valid_cookie_value("ñ"));
    }

    #[test]
    fn cookie_value_finds_named_cookie() {
        let headers = headers("theme=dark; auth-token=abc; XSRF-TOKEN=xyz");
        assert_eq!(cookie_value(&headers, SESSION_COOKIE_NAME), Some("abc".to_string()));
        assert_eq!(cookie_value(&headers, CSRF_COOKIE_NAME), Some("xyz".to_string()));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn cookie_value_handles_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("XSRF-TOKEN=xyz"));
        assert_eq!(cookie_value(&headers, CSRF_COOKIE_NAME), Some("xyz".to_string()));
    }

    #[test]
    fn cookie_value_without_cookie_header() {
        assert_eq!(cookie_value(&HeaderMap::new(), SESSION_COOKIE_NAME), None);
    }

    #[test]
    fn cookie_value_does_not_match_prefix() {
        let headers = headers("auth-token-old=abc");
        assert_eq!(cookie_value(&headers, SESSION_COOKIE_NAME), None);
    }
}
