//! Hydrated session material.
//!
//! Cookies and the device session token are acquired elsewhere (a browser
//! export, a host application). This module validates them into a
//! [`SessionContext`] and derives the request headers every call carries.
//! Two hydration sources are supported: a Netscape-format cookie file and a
//! JSON session file.

mod context;
mod cookies;
mod hydrate;

pub use context::{
    DEVICE_TOKEN_HEADER, REQUIRED_COOKIES, SESSION_ID_COOKIE, SESSION_ID_HEADER,
    SESSION_TOKEN_COOKIE, SessionContext,
};
pub use cookies::{CookieError, CookieLine, ParseResult, parse_netscape_cookies};
pub use hydrate::{SessionFile, load_cookie_file, load_session_file};

use thiserror::Error;

/// Errors raised while building a [`SessionContext`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// A required cookie is absent or empty.
    #[error("required cookie `{name}` is missing from the session\n  Suggestion: export cookies from a signed-in browser session")]
    MissingCookie {
        /// Cookie name.
        name: &'static str,
    },

    /// The device session token is empty.
    #[error("device session token is empty")]
    EmptyDeviceToken,

    /// A value cannot be sent as an HTTP header.
    #[error("value for `{name}` is not a valid HTTP header value")]
    InvalidHeaderValue {
        /// Header or cookie the value belongs to.
        name: &'static str,
    },

    /// Cookie file could not be parsed.
    #[error(transparent)]
    Cookie(#[from] CookieError),

    /// Session or cookie file could not be read.
    #[error("cannot read '{path}': {source}")]
    Io {
        /// File path.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Session file is not valid JSON.
    #[error("cannot parse session file '{path}': {source}")]
    Json {
        /// File path.
        path: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}
