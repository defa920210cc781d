//! Client configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config. Values
//! are checked by [`ClientConfig::validate`] before a client is built.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::endpoint::{DEFAULT_READ_BASE_URL, DEFAULT_SIGN_IN_BASE_URL, EndpointBuilder};
use crate::error::KindleError;
use crate::transport::{
    DEFAULT_HTML_MAX_ATTEMPTS, DEFAULT_JSON_MAX_ATTEMPTS, HttpSettings, RetryPolicy,
};
use crate::user_agent;

/// Default TCP connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default whole-request timeout.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Default `querySize` for the JSON library search.
pub const DEFAULT_LIBRARY_PAGE_SIZE: u32 = 50;

const TIMEOUT_RANGE: std::ops::RangeInclusive<u64> = 1..=3600;
const ATTEMPTS_RANGE: std::ops::RangeInclusive<u32> = 1..=10;
const PAGE_SIZE_RANGE: std::ops::RangeInclusive<u32> = 1..=200;

/// Settings for a [`KindleClient`](crate::KindleClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Cloud reader host, e.g. `https://read.amazon.com`.
    pub read_base_url: String,
    /// Sign-in host, e.g. `https://www.amazon.com`.
    pub sign_in_base_url: String,
    /// User-Agent header value.
    pub user_agent: String,
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds.
    pub read_timeout_secs: u64,
    /// Attempt budget for notebook (HTML) fetches.
    pub html_max_attempts: u32,
    /// Attempt budget for service API (JSON) fetches.
    pub json_max_attempts: u32,
    /// Books per JSON library page.
    pub library_page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            read_base_url: DEFAULT_READ_BASE_URL.to_string(),
            sign_in_base_url: DEFAULT_SIGN_IN_BASE_URL.to_string(),
            user_agent: user_agent::default_user_agent(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            html_max_attempts: DEFAULT_HTML_MAX_ATTEMPTS,
            json_max_attempts: DEFAULT_JSON_MAX_ATTEMPTS,
            library_page_size: DEFAULT_LIBRARY_PAGE_SIZE,
        }
    }
}

impl ClientConfig {
    /// Checks every value against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`KindleError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), KindleError> {
        parse_base_url("read_base_url", &self.read_base_url)?;
        parse_base_url("sign_in_base_url", &self.sign_in_base_url)?;

        if self.user_agent.trim().is_empty() {
            return Err(KindleError::invalid_config("user_agent", "must not be empty"));
        }

        check_range("connect_timeout_secs", self.connect_timeout_secs, &TIMEOUT_RANGE)?;
        check_range("read_timeout_secs", self.read_timeout_secs, &TIMEOUT_RANGE)?;
        check_range("html_max_attempts", self.html_max_attempts, &ATTEMPTS_RANGE)?;
        check_range("json_max_attempts", self.json_max_attempts, &ATTEMPTS_RANGE)?;
        check_range("library_page_size", self.library_page_size, &PAGE_SIZE_RANGE)?;
        Ok(())
    }

    /// Parsed reader base URL.
    ///
    /// # Errors
    ///
    /// Returns [`KindleError::InvalidConfig`] when the URL does not parse.
    pub fn read_base(&self) -> Result<Url, KindleError> {
        parse_base_url("read_base_url", &self.read_base_url)
    }

    /// Endpoint builder for the configured hosts.
    #[must_use]
    pub fn endpoints(&self) -> EndpointBuilder {
        EndpointBuilder::new(&self.read_base_url, &self.sign_in_base_url)
    }

    /// Retry policy for notebook pages.
    #[must_use]
    pub fn html_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::with_max_attempts(self.html_max_attempts)
    }

    /// Retry policy for service API calls.
    #[must_use]
    pub fn json_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::with_max_attempts(self.json_max_attempts)
    }

    /// Network settings for the HTTP client.
    #[must_use]
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            user_agent: self.user_agent.clone(),
            connect_timeout_secs: self.connect_timeout_secs,
            read_timeout_secs: self.read_timeout_secs,
        }
    }
}

fn parse_base_url(field: &'static str, value: &str) -> Result<Url, KindleError> {
    let url = Url::parse(value).map_err(|e| KindleError::invalid_config(field, e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(KindleError::invalid_config(
            field,
            format!("unsupported scheme `{}`", url.scheme()),
        ));
    }
    Ok(url)
}

fn check_range<T>(
    field: &'static str,
    value: T,
    range: &std::ops::RangeInclusive<T>,
) -> Result<(), KindleError>
where
    T: PartialOrd + std::fmt::Display,
{
    if range.contains(&value) {
        Ok(())
    } else {
        Err(KindleError::invalid_config(
            field,
            format!(
                "{value} is outside the allowed range {}..={}",
                range.start(),
                range.end()
            ),
        ))
    }
}
