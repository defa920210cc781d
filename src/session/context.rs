use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;
use url::Url;

use super::{CookieLine, SessionError};

/// Cookie carrying the session id; its value is echoed in [`SESSION_ID_HEADER`].
pub const SESSION_ID_COOKIE: &str = "session-id";

/// Short-lived session token cookie. Optional: carried when present.
pub const SESSION_TOKEN_COOKIE: &str = "session-token";

/// Long-lived identity cookies that must be present for any call to succeed.
pub const REQUIRED_COOKIES: [&str; 4] = ["ubid-main", "at-main", "x-main", SESSION_ID_COOKIE];

/// Header carrying the session id cookie value.
pub const SESSION_ID_HEADER: &str = "x-amzn-sessionid";

/// Header carrying the device session token.
pub const DEVICE_TOKEN_HEADER: &str = "x-adp-session-token";

/// Validated, immutable authentication material for one reader account.
///
/// Construction fails when any of [`REQUIRED_COOKIES`] is missing, so a
/// context that exists can always produce both request headers.
#[derive(Clone)]
pub struct SessionContext {
    cookies: BTreeMap<String, String>,
    device_session_token: String,
    session_id: String,
    headers: HeaderMap,
}

impl SessionContext {
    /// Builds a context from name/value cookie pairs and the device session token.
    ///
    /// Later pairs with the same name replace earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when a required cookie is absent or empty, the
    /// device token is empty, or a value cannot be sent as a header.
    pub fn new<I, K, V>(
        cookies: I,
        device_session_token: impl Into<String>,
    ) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let cookies: BTreeMap<String, String> = cookies
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        let device_session_token = device_session_token.into();

        for required in REQUIRED_COOKIES {
            if cookies.get(required).is_none_or(|value| value.is_empty()) {
                return Err(SessionError::MissingCookie { name: required });
            }
        }
        if device_session_token.trim().is_empty() {
            return Err(SessionError::EmptyDeviceToken);
        }
        for (name, value) in &cookies {
            if value.contains(';') || HeaderValue::from_str(&format!("{name}={value}")).is_err() {
                return Err(SessionError::InvalidHeaderValue { name: "cookie" });
            }
        }

        let session_id = cookies
            .get(SESSION_ID_COOKIE)
            .cloned()
            .ok_or(SessionError::MissingCookie {
                name: SESSION_ID_COOKIE,
            })?;
        let headers = build_headers(&session_id, &device_session_token)?;

        debug!(
            cookies = cookies.len(),
            has_session_token = cookies.contains_key(SESSION_TOKEN_COOKIE),
            "session context hydrated"
        );

        Ok(Self {
            cookies,
            device_session_token,
            session_id,
            headers,
        })
    }

    /// Builds a context from parsed Netscape cookie lines.
    ///
    /// # Errors
    ///
    /// Same as [`SessionContext::new`].
    pub fn from_cookie_lines(
        lines: &[CookieLine],
        device_session_token: impl Into<String>,
    ) -> Result<Self, SessionError> {
        Self::new(
            lines
                .iter()
                .map(|line| (line.name.clone(), line.value().to_string())),
            device_session_token,
        )
    }

    /// Returns the session id (value of the `session-id` cookie).
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Returns the device session token. Sensitive: avoid logging.
    #[must_use]
    pub fn device_session_token(&self) -> &str {
        &self.device_session_token
    }

    /// Returns a cookie value by name. Sensitive: avoid logging.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Returns the number of cookies in the session.
    #[must_use]
    pub fn cookie_count(&self) -> usize {
        self.cookies.len()
    }

    /// Returns the two headers every request carries.
    #[must_use]
    pub fn request_headers(&self) -> HeaderMap {
        self.headers.clone()
    }

    /// Creates a fresh jar holding exactly this session's cookies, scoped to `base_url`'s host.
    pub(crate) fn cookie_jar(&self, base_url: &Url) -> Arc<Jar> {
        let jar = Jar::default();
        for (name, value) in &self.cookies {
            jar.add_cookie_str(&format!("{name}={value}; Path=/"), base_url);
        }
        Arc::new(jar)
    }
}

fn build_headers(session_id: &str, device_session_token: &str) -> Result<HeaderMap, SessionError> {
    let mut headers = HeaderMap::new();
    let session_value = HeaderValue::from_str(session_id).map_err(|_| {
        SessionError::InvalidHeaderValue {
            name: SESSION_ID_HEADER,
        }
    })?;
    let mut token_value = HeaderValue::from_str(device_session_token).map_err(|_| {
        SessionError::InvalidHeaderValue {
            name: DEVICE_TOKEN_HEADER,
        }
    })?;
    token_value.set_sensitive(true);
    headers.insert(HeaderName::from_static(SESSION_ID_HEADER), session_value);
    headers.insert(HeaderName::from_static(DEVICE_TOKEN_HEADER), token_value);
    Ok(headers)
}

// Values are redacted so a context can be logged without leaking credentials.
impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("cookies", &self.cookies.keys().collect::<Vec<_>>())
            .field("device_session_token", &"[REDACTED]")
            .field("session_id", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
