//! Per-session reqwest client construction.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use tracing::debug;
use url::Url;

use crate::error::KindleError;
use crate::session::SessionContext;

/// Network settings for one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// User-Agent sent with every request.
    pub user_agent: String,
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds.
    pub read_timeout_secs: u64,
}

/// Builds a client bound to one session.
///
/// The cookie jar is private to the returned client and seeded with exactly
/// the session cookies, scoped to `read_base_url`. The session headers are
/// installed as default headers.
///
/// # Errors
///
/// Returns [`KindleError::HttpClient`] when reqwest cannot build the client
/// (for example, the TLS backend failed to initialize).
pub fn build_http_client(
    session: &SessionContext,
    read_base_url: &Url,
    settings: &HttpSettings,
) -> Result<Client, KindleError> {
    let client = base_client_builder(session, read_base_url, settings)
        .build()
        .map_err(KindleError::HttpClient)?;
    debug!(
        host = read_base_url.host_str().unwrap_or_default(),
        cookies = session.cookie_count(),
        "built session HTTP client"
    );
    Ok(client)
}

fn base_client_builder(
    session: &SessionContext,
    read_base_url: &Url,
    settings: &HttpSettings,
) -> ClientBuilder {
    Client::builder()
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .timeout(Duration::from_secs(settings.read_timeout_secs))
        .gzip(true)
        .user_agent(settings.user_agent.clone())
        .cookie_provider(session.cookie_jar(read_base_url))
        .default_headers(session.request_headers())
}
