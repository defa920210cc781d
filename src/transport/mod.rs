//! HTTP transport with response validation and bounded immediate retry.
//!
//! - [`build_http_client`] creates an isolated reqwest client per session
//! - [`TransportGuard`] validates status and final URL for each fetch
//! - [`RetryPolicy`] decides whether a failed attempt is re-issued

mod guard;
mod http_client;
mod retry;

pub use guard::TransportGuard;
pub use http_client::{HttpSettings, build_http_client};
pub use retry::{
    DEFAULT_HTML_MAX_ATTEMPTS, DEFAULT_JSON_MAX_ATTEMPTS, FailureType, RetryDecision, RetryPolicy,
    classify_http_status,
};
