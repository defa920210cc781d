//! Error types for cloud reader operations.
//!
//! [`KindleError`] is the single taxonomy surfaced by the public operations.
//! [`HtmlFieldError`] describes why one notebook fragment could not be turned
//! into a record; it is usually swallowed per item and only surfaces as the
//! cause of a whole-page [`KindleError::HtmlDecoding`].

use thiserror::Error;

/// Errors that can occur while talking to the cloud reader backend.
#[derive(Debug, Error)]
pub enum KindleError {
    /// Session expired or invalid: 401-403, or a 2xx that resolved to the sign-in page.
    #[error(
        "[AUTH] session is not authenticated for {url}\n  Suggestion: refresh the session cookies and device token"
    )]
    Unauthenticated {
        /// The requested URL.
        url: String,
    },

    /// Upstream 5xx persisted after every allowed attempt.
    #[error("service error HTTP {status} from {url} after {attempts} attempt(s)")]
    ServiceError {
        /// The requested URL.
        url: String,
        /// Status of the last attempt.
        status: u16,
        /// Number of attempts made.
        attempts: u32,
    },

    /// Response status outside the handled ranges.
    #[error("unexpected HTTP {status} from {url}")]
    BadResponse {
        /// The requested URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Network-level failure (connection, TLS, timeout, body read).
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The requested URL.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// A JSON body could not be decoded into the expected record.
    #[error("failed to decode {context}: {source}")]
    Decoding {
        /// What was being decoded.
        context: &'static str,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// A notebook page did not have the expected shape.
    #[error("failed to parse notebook page: {reason}")]
    HtmlDecoding {
        /// Description of the shape mismatch.
        reason: String,
        /// Inner parse failure, absent when the page simply had no candidates.
        #[source]
        source: Option<HtmlFieldError>,
    },

    /// Book details did not carry a metadata locator.
    #[error("book {asin} has no metadata URL in its details")]
    MissingMetadata {
        /// Book identifier.
        asin: String,
    },

    /// Internal invariant violated. Must not happen in correct operation.
    #[error("client defect: {reason}")]
    ClientDefect {
        /// What invariant was violated.
        reason: String,
    },

    /// Client configuration value rejected by validation.
    #[error("invalid config value for `{field}`: {reason}")]
    InvalidConfig {
        /// Config field name.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client construction failed: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl KindleError {
    /// Creates an `Unauthenticated` error.
    pub fn unauthenticated(url: impl Into<String>) -> Self {
        Self::Unauthenticated { url: url.into() }
    }

    /// Creates a `ServiceError`.
    pub fn service_error(url: impl Into<String>, status: u16, attempts: u32) -> Self {
        Self::ServiceError {
            url: url.into(),
            status,
            attempts,
        }
    }

    /// Creates a `BadResponse` error.
    pub fn bad_response(url: impl Into<String>, status: u16) -> Self {
        Self::BadResponse {
            url: url.into(),
            status,
        }
    }

    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a decoding error.
    pub fn decoding(context: &'static str, source: serde_json::Error) -> Self {
        Self::Decoding { context, source }
    }

    /// Creates a whole-page HTML error with no inner cause.
    pub fn html(reason: impl Into<String>) -> Self {
        Self::HtmlDecoding {
            reason: reason.into(),
            source: None,
        }
    }

    /// Creates a whole-page HTML error wrapping an inner parse failure.
    pub fn html_with_cause(reason: impl Into<String>, cause: HtmlFieldError) -> Self {
        Self::HtmlDecoding {
            reason: reason.into(),
            source: Some(cause),
        }
    }

    /// Creates a `ClientDefect` error.
    pub fn client_defect(reason: impl Into<String>) -> Self {
        Self::ClientDefect {
            reason: reason.into(),
        }
    }

    /// Creates an `InvalidConfig` error.
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Returns true when the session must be refreshed before retrying.
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated { .. })
    }
}

/// Why a single notebook fragment could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HtmlFieldError {
    /// A required element was not found.
    #[error("missing element `{selector}`")]
    MissingElement {
        /// Selector that matched nothing.
        selector: String,
    },

    /// A required attribute was absent or empty.
    #[error("missing attribute `{attribute}` on `{element}`")]
    MissingAttribute {
        /// Element description.
        element: &'static str,
        /// Attribute name.
        attribute: &'static str,
    },

    /// A date did not match the notebook date format.
    #[error("invalid date '{value}': {reason}")]
    InvalidDate {
        /// Raw date text.
        value: String,
        /// Parser message.
        reason: String,
    },

    /// A selector built from page data could not be compiled.
    #[error("invalid selector `{selector}`")]
    InvalidSelector {
        /// Selector text.
        selector: String,
    },
}

impl HtmlFieldError {
    pub(crate) fn missing_element(selector: impl Into<String>) -> Self {
        Self::MissingElement {
            selector: selector.into(),
        }
    }

    pub(crate) fn missing_attribute(element: &'static str, attribute: &'static str) -> Self {
        Self::MissingAttribute { element, attribute }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_unauthenticated_message_has_suggestion() {
        let err = KindleError::unauthenticated("https://read.amazon.com/notebook");
        let msg = err.to_string();
        assert!(msg.contains("[AUTH]"));
        assert!(msg.contains("read.amazon.com/notebook"));
        assert!(msg.contains("Suggestion"));
        assert!(err.is_unauthenticated());
    }

    #[test]
    fn test_service_error_message_reports_attempts() {
        let err = KindleError::service_error("https://read.amazon.com/x", 503, 2);
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("2 attempt(s)"));
        assert!(!err.is_unauthenticated());
    }

    #[test]
    fn test_html_error_without_cause_has_no_source() {
        let err = KindleError::html("no book cards found");
        assert!(err.source().is_none());
        assert!(err.to_string().contains("no book cards found"));
    }

    #[test]
    fn test_html_error_with_cause_exposes_source() {
        let err = KindleError::html_with_cause(
            "annotations container missing",
            HtmlFieldError::missing_element("#kp-notebook-annotations"),
        );
        let source = err.source().unwrap();
        assert!(source.to_string().contains("#kp-notebook-annotations"));
    }

    #[test]
    fn test_decoding_error_wraps_serde_cause() {
        let cause = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = KindleError::decoding("library page", cause);
        assert!(err.to_string().starts_with("failed to decode library page"));
        assert!(err.source().is_some());
    }
}
