//! Immediate-retry policy for reader backend responses.
//!
//! The backend signals failure inconsistently. Expired sessions come back as
//! 401-403 or as a 200 after a redirect to the sign-in page, and the notebook
//! pages throw sporadic 5xx that succeed when re-requested straight away. Only
//! the 5xx class is retried, with no delay, up to the policy's attempt budget.
//!
//! # Example
//!
//! ```
//! use kindle_notebook::transport::{RetryDecision, RetryPolicy, classify_http_status};
//!
//! let policy = RetryPolicy::html();
//! let failure = classify_http_status(503);
//!
//! match policy.should_retry(failure, 1) {
//!     RetryDecision::Retry { attempt } => println!("retrying now (attempt {attempt})"),
//!     RetryDecision::DoNotRetry { reason } => println!("giving up: {reason}"),
//! }
//! ```

use tracing::{debug, instrument};

/// Attempt budget for notebook (HTML) fetches, where transient 5xx are seen.
pub const DEFAULT_HTML_MAX_ATTEMPTS: u32 = 2;

/// Attempt budget for service API (JSON) fetches.
pub const DEFAULT_JSON_MAX_ATTEMPTS: u32 = 1;

/// Classification of a non-success response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// Upstream 5xx. May succeed on an immediate re-request.
    Transient,

    /// 401-403. The session must be refreshed; retrying cannot help.
    NeedsAuth,

    /// Any other status outside 2xx.
    Permanent,
}

/// Decision on whether to re-issue a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Re-issue the request immediately.
    Retry {
        /// Which attempt the re-request will be (1-indexed, so the first retry is attempt 2).
        attempt: u32,
    },

    /// Surface the failure.
    DoNotRetry {
        /// Human-readable reason why retry is not attempted.
        reason: String,
    },
}

/// Bounded immediate retry. Never sleeps, never backs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial attempt).
    max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::json()
    }
}

impl RetryPolicy {
    /// Creates a policy with `max_attempts` total attempts, at least one.
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Default budget for notebook pages.
    #[must_use]
    pub fn html() -> Self {
        Self::with_max_attempts(DEFAULT_HTML_MAX_ATTEMPTS)
    }

    /// Default budget for service API calls.
    #[must_use]
    pub fn json() -> Self {
        Self::with_max_attempts(DEFAULT_JSON_MAX_ATTEMPTS)
    }

    /// Returns the maximum number of attempts configured.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Decides whether to re-issue after `attempt` (1-indexed) failed with `failure_type`.
    #[instrument(skip(self), fields(max_attempts = self.max_attempts))]
    pub fn should_retry(&self, failure_type: FailureType, attempt: u32) -> RetryDecision {
        match failure_type {
            FailureType::NeedsAuth => {
                return RetryDecision::DoNotRetry {
                    reason: "session rejected - retrying with the same cookies would not help"
                        .to_string(),
                };
            }
            FailureType::Permanent => {
                return RetryDecision::DoNotRetry {
                    reason: "unexpected status - retry would not help".to_string(),
                };
            }
            FailureType::Transient => {}
        }

        if attempt >= self.max_attempts {
            debug!(attempt, max = self.max_attempts, "max attempts reached");
            return RetryDecision::DoNotRetry {
                reason: format!("max attempts ({}) exhausted", self.max_attempts),
            };
        }

        debug!(attempt, next_attempt = attempt + 1, "will retry immediately");
        RetryDecision::Retry {
            attempt: attempt + 1,
        }
    }
}

/// Classifies a non-2xx status code.
///
/// | Status | Type |
/// |--------|------|
/// | 401-403 | `NeedsAuth` |
/// | 500-599 | `Transient` |
/// | anything else | `Permanent` |
#[must_use]
pub fn classify_http_status(status: u16) -> FailureType {
    match status {
        401..=403 => FailureType::NeedsAuth,
        500..=599 => FailureType::Transient,
        _ => FailureType::Permanent,
    }
}
