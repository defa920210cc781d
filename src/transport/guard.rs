//! Response validation around a single logical GET.

use reqwest::Client;
use tracing::{debug, instrument, warn};
use url::Url;

use super::retry::{FailureType, RetryDecision, RetryPolicy, classify_http_status};
use crate::endpoint::SIGN_IN_PATH;
use crate::error::KindleError;

/// Sends GET requests and turns the backend's failure signals into [`KindleError`].
///
/// Cloning is cheap; clones share the underlying connection pool and cookie jar.
#[derive(Debug, Clone)]
pub struct TransportGuard {
    client: Client,
}

impl TransportGuard {
    /// Wraps a session-bound client (see [`build_http_client`](super::build_http_client)).
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetches `url` and returns the body as text.
    ///
    /// 5xx responses are re-requested immediately while `policy` allows it.
    /// A 2xx whose final URL (after redirects) is the sign-in page counts as
    /// unauthenticated.
    ///
    /// # Errors
    ///
    /// - [`KindleError::Unauthenticated`] on 401-403 or a sign-in redirect
    /// - [`KindleError::ServiceError`] when 5xx persists through every attempt
    /// - [`KindleError::BadResponse`] on any other non-2xx status
    /// - [`KindleError::Network`] when the request or body read fails
    #[instrument(skip(self, policy), fields(max_attempts = policy.max_attempts()))]
    pub async fn fetch_text(&self, url: &str, policy: &RetryPolicy) -> Result<String, KindleError> {
        for attempt in 1..=policy.max_attempts() {
            let response = self.client.get(url).send().await.map_err(|e| {
                warn!(url, attempt, error = %e, "request failed");
                KindleError::network(url, e)
            })?;

            let status = response.status();
            if status.is_success() {
                if is_sign_in_page(response.url()) {
                    warn!(url, final_url = %response.url(), "session redirected to sign-in page");
                    return Err(KindleError::unauthenticated(url));
                }
                let body = response.text().await.map_err(|e| {
                    warn!(url, error = %e, "failed to read response body");
                    KindleError::network(url, e)
                })?;
                debug!(url, attempt, bytes = body.len(), "response accepted");
                return Ok(body);
            }

            let code = status.as_u16();
            let failure = classify_http_status(code);
            match policy.should_retry(failure, attempt) {
                RetryDecision::Retry { attempt: next } => {
                    debug!(url, status = code, next_attempt = next, "transient failure, re-requesting");
                }
                RetryDecision::DoNotRetry { reason } => {
                    warn!(url, status = code, attempt, %reason, "request failed");
                    return Err(match failure {
                        FailureType::NeedsAuth => KindleError::unauthenticated(url),
                        FailureType::Transient => KindleError::service_error(url, code, attempt),
                        FailureType::Permanent => KindleError::bad_response(url, code),
                    });
                }
            }
        }

        Err(KindleError::client_defect(format!(
            "retry loop for {url} ended without a result"
        )))
    }
}

fn is_sign_in_page(url: &Url) -> bool {
    url.path().starts_with(SIGN_IN_PATH)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, Respond, ResponseTemplate};

    use super::*;
    use crate::test_support::socket_guard::start_mock_server_or_skip;

    struct FlakyResponder {
        request_count: Arc<AtomicUsize>,
        fail_count: usize,
        fail_status: u16,
    }

    impl Respond for FlakyResponder {
        fn respond(&self, _request: &wiremock::Request) -> ResponseTemplate {
            let n = self.request_count.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_count {
                ResponseTemplate::new(self.fail_status).set_body_string("internal server error")
            } else {
                ResponseTemplate::new(200).set_body_string("<html>ok</html>")
            }
        }
    }

    fn guard() -> TransportGuard {
        TransportGuard::new(Client::new())
    }

    #[test]
    fn test_is_sign_in_page_checks_path_prefix() {
        assert!(is_sign_in_page(&Url::parse("https://www.amazon.com/ap/signin?openid=x").unwrap()));
        assert!(!is_sign_in_page(&Url::parse("https://read.amazon.com/notebook").unwrap()));
        assert!(!is_sign_in_page(&Url::parse("https://read.amazon.com/x/ap/signin").unwrap()));
    }

    #[tokio::test]
    async fn test_transient_500_then_success_within_budget() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let count = Arc::new(AtomicUsize::new(0));
        Mock::given(method("GET"))
            .and(path("/notebook"))
            .respond_with(FlakyResponder {
                request_count: Arc::clone(&count),
                fail_count: 1,
                fail_status: 500,
            })
            .mount(&mock_server)
            .await;

        let url = format!("{}/notebook", mock_server.uri());
        let body = guard().fetch_text(&url, &RetryPolicy::html()).await.unwrap();

        assert_eq!(body, "<html>ok</html>");
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_transient_failure_exhausts_single_attempt_budget() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let count = Arc::new(AtomicUsize::new(0));
        Mock::given(method("GET"))
            .respond_with(FlakyResponder {
                request_count: Arc::clone(&count),
                fail_count: 1,
                fail_status: 503,
            })
            .mount(&mock_server)
            .await;

        let url = format!("{}/kindle-library/search", mock_server.uri());
        let err = guard().fetch_text(&url, &RetryPolicy::json()).await.unwrap_err();

        match err {
            KindleError::ServiceError { status, attempts, .. } => {
                assert_eq!(status, 503);
                assert_eq!(attempts, 1);
            }
            other => panic!("expected ServiceError, got {other:?}"),
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_persistent_5xx_reports_attempt_count() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .expect(2)
            .mount(&mock_server)
            .await;

        let url = format!("{}/notebook", mock_server.uri());
        let err = guard().fetch_text(&url, &RetryPolicy::html()).await.unwrap_err();

        assert!(matches!(
            err,
            KindleError::ServiceError { status: 502, attempts: 2, .. }
        ));
    }

    #[tokio::test]
    async fn test_auth_statuses_are_not_retried() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/notebook", mock_server.uri());
        let err = guard()
            .fetch_text(&url, &RetryPolicy::with_max_attempts(5))
            .await
            .unwrap_err();

        assert!(err.is_unauthenticated());
    }

    #[tokio::test]
    async fn test_redirect_to_sign_in_is_unauthenticated() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/notebook"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", format!("{}/ap/signin?openid.return_to=x", mock_server.uri())),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ap/signin"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>Sign-In</html>"))
            .mount(&mock_server)
            .await;

        let url = format!("{}/notebook", mock_server.uri());
        let err = guard().fetch_text(&url, &RetryPolicy::html()).await.unwrap_err();

        match err {
            KindleError::Unauthenticated { url: reported } => assert_eq!(reported, url),
            other => panic!("expected Unauthenticated, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unexpected_status_is_bad_response() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/missing", mock_server.uri());
        let err = guard().fetch_text(&url, &RetryPolicy::html()).await.unwrap_err();

        assert!(matches!(err, KindleError::BadResponse { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_error() {
        let url = "http://127.0.0.1:9/unreachable";
        let err = guard().fetch_text(url, &RetryPolicy::html()).await.unwrap_err();
        assert!(matches!(err, KindleError::Network { .. }));
    }
}
