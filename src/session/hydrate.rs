//! JSON session file loading.
//!
//! A host application that already holds the hydrated cookies can hand them
//! over as a small JSON document:
//!
//! ```json
//! {
//!   "cookies": { "ubid-main": "...", "at-main": "...", "x-main": "...", "session-id": "..." },
//!   "deviceSessionToken": "..."
//! }
//! ```
//!
//! A Netscape cookie export from a signed-in browser works too, paired with
//! the device session token captured from the same session.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::{SessionContext, SessionError, parse_netscape_cookies};

/// On-disk shape of a hydrated session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFile {
    /// Cookie name to value.
    pub cookies: BTreeMap<String, String>,
    /// Device session token.
    pub device_session_token: String,
}

impl SessionFile {
    /// Validates the file contents into a [`SessionContext`].
    ///
    /// # Errors
    ///
    /// Same as [`SessionContext::new`].
    pub fn into_context(self) -> Result<SessionContext, SessionError> {
        SessionContext::new(self.cookies, self.device_session_token)
    }
}

/// Reads and validates a JSON session file.
///
/// # Errors
///
/// Returns [`SessionError::Io`] or [`SessionError::Json`] when the file cannot
/// be read or decoded, and the [`SessionContext::new`] errors when the
/// material is incomplete.
#[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn load_session_file(path: impl AsRef<Path>) -> Result<SessionContext, SessionError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| SessionError::Io {
        path: display.clone(),
        source,
    })?;
    let file: SessionFile =
        serde_json::from_str(&raw).map_err(|source| SessionError::Json {
            path: display,
            source,
        })?;
    let context = file.into_context()?;
    info!(cookies = context.cookie_count(), "Loaded session file");
    Ok(context)
}

/// Reads a Netscape cookie file and builds a context from the cookies that
/// apply to `host`.
///
/// Malformed lines are logged and skipped.
///
/// # Errors
///
/// Returns [`SessionError::Io`] when the file cannot be opened,
/// [`SessionError::Cookie`] when it holds no usable cookie line, and the
/// [`SessionContext::new`] errors when a required cookie is absent for `host`.
#[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display(), host))]
pub fn load_cookie_file(
    path: impl AsRef<Path>,
    host: &str,
    device_session_token: impl Into<String>,
) -> Result<SessionContext, SessionError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| SessionError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let parsed = parse_netscape_cookies(BufReader::new(file))?;
    let cookies = parsed.for_host(host);
    debug!(cookies = cookies.len(), "cookies selected for reader host");
    let context = SessionContext::from_cookie_lines(&cookies, device_session_token)?;
    info!(cookies = context.cookie_count(), "Loaded cookie file");
    Ok(context)
}
