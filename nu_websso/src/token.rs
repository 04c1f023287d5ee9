use http::header::{COOKIE, HeaderMap};
use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;

/// The name of the NU SSO cookie
pub const SSO_COOKIE_NAME: &str = "nusso";

/// Opaque session token carried in the SSO cookie
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Returns `None` for an empty value
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(4).collect();
        format!("{prefix}...")
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&self.redacted()).finish()
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// Returns the SSO cookie value from a map of request cookies
///
/// A missing or empty cookie yields `None`.
pub fn get_sso_cookie<S: BuildHasher>(
    request_cookies: &HashMap<String, String, S>,
) -> Option<SessionToken> {
    request_cookies
        .get(SSO_COOKIE_NAME)
        .and_then(|value| SessionToken::new(value.as_str()))
}

/// Returns the SSO cookie value from raw `Cookie` request headers
pub fn get_sso_cookie_from_headers(headers: &HeaderMap) -> Option<SessionToken> {
    let token = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| match value.to_str() {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::debug!("Skipping unreadable cookie header: {}", e);
                None
            }
        })
        .flat_map(|s| s.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name.trim() == SSO_COOKIE_NAME).then(|| value.trim().trim_matches('"'))
        })
        .and_then(SessionToken::new);

    if token.is_none() {
        tracing::debug!("No '{}' cookie found in request", SSO_COOKIE_NAME);
    }
    token
}

/// Returns the SSO cookie value from a typed `Cookie` header
pub fn get_sso_cookie_from_typed(cookies: &headers::Cookie) -> Option<SessionToken> {
    cookies.get(SSO_COOKIE_NAME).and_then(SessionToken::new)
}
