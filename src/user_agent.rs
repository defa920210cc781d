//! Default User-Agent for cloud reader requests.
//!
//! The reader backend serves the notebook page only to browser-like clients, so
//! the default mirrors a desktop browser. Config can override it.

/// Desktop browser User-Agent sent when the config does not override it.
pub(crate) const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Returns the default User-Agent as an owned string for config defaults.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    BROWSER_USER_AGENT.to_string()
}
