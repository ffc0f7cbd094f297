//! HTTP transport with a uniform retry/backoff policy.
//!
//! Every outbound provider call goes through [`HttpClient::execute`], which
//! enforces TLS verification, per-attempt timeouts, a bounded total retry
//! budget, exponential backoff with jitter, and `Retry-After` handling.

use rand::Rng;
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

use crate::error::FetchError;

/// Default per-attempt timeout (connect + read).
const DEFAULT_ATTEMPT_TIMEOUT_SECS: u64 = 20;

/// Default connect timeout.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// User agent string for Wayfarer.
const USER_AGENT: &str = concat!("Wayfarer/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Retry Policy
// ============================================================================

/// Policy for retrying transient failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (first try included).
    pub max_attempts: u32,
    /// Base delay before the first retry.
    pub base_delay: Duration,
    /// Cap on any single computed delay.
    pub max_delay: Duration,
    /// Total wall-clock budget across all attempts and delays.
    pub total_budget: Duration,
}

impl RetryPolicy {
    /// Creates a policy with the given attempt cap.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            total_budget: Duration::from_secs(60),
        }
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            total_budget: Duration::from_secs(30),
        }
    }

    /// Sets the base delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Sets the total wall-clock budget.
    pub fn with_total_budget(mut self, budget: Duration) -> Self {
        self.total_budget = budget;
        self
    }

    /// Whether a status code is retryable: 429 and every 5xx.
    pub fn should_retry_status(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }

    /// Exponential backoff delay for an attempt number (1-based), with
    /// jitter in the upper half of the window, capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exp = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)));
        let capped = exp.min(self.max_delay);
        if capped.is_zero() {
            return capped;
        }
        let jitter = rand::thread_rng().gen_range(0.5..=1.0);
        capped.mul_f64(jitter)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5)
    }
}

// ============================================================================
// Transport Settings
// ============================================================================

/// Settings for the HTTP transport.
#[derive(Debug, Clone)]
pub struct TransportSettings {
    /// Per-attempt timeout (connect + read).
    pub attempt_timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// Retry policy for transient failures.
    pub retry: RetryPolicy,
    /// Relax TLS verification. Diagnostic use only; never the default.
    pub allow_insecure_tls: bool,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(DEFAULT_ATTEMPT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
            allow_insecure_tls: false,
        }
    }
}

impl TransportSettings {
    /// Sets the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the per-attempt timeout.
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }
}

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper enforcing the uniform retry/backoff policy.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    retry: RetryPolicy,
    attempt_timeout: Duration,
}

impl HttpClient {
    /// Creates a client with default settings.
    ///
    /// # Panics
    ///
    /// Panics if the underlying client cannot be built, which indicates a
    /// fundamentally broken TLS configuration and is unrecoverable.
    pub fn new() -> Self {
        Self::with_settings(&TransportSettings::default())
    }

    /// Creates a client from explicit settings.
    ///
    /// # Panics
    ///
    /// Panics if the underlying client cannot be built (broken TLS setup).
    pub fn with_settings(settings: &TransportSettings) -> Self {
        if settings.allow_insecure_tls {
            warn!("TLS certificate verification is DISABLED; diagnostic use only");
        }

        let inner = Client::builder()
            .timeout(settings.attempt_timeout)
            .connect_timeout(settings.connect_timeout)
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(settings.allow_insecure_tls)
            .build()
            .unwrap_or_else(|e| {
                panic!(
                    "Failed to create HTTP client: {e}. \
                    This usually indicates a broken TLS configuration."
                )
            });

        Self {
            inner,
            retry: settings.retry.clone(),
            attempt_timeout: settings.attempt_timeout,
        }
    }

    /// Starts a GET request against a URL.
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.inner.get(url)
    }

    /// Starts a POST request against a URL.
    pub fn post(&self, url: &str) -> RequestBuilder {
        self.inner.post(url)
    }

    /// Executes a request under the retry policy.
    ///
    /// Retries 429, 5xx, and connection-level failures with exponential
    /// backoff (a `Retry-After` header overrides the computed delay) up to
    /// the attempt cap and total wall-clock budget. The budget bounds the
    /// attempts themselves, not just the backoff sleeps: each attempt's
    /// timeout is clipped to whatever budget remains. Any other response,
    /// including non-retryable 4xx, is returned to the caller for
    /// provider-specific handling.
    #[instrument(skip(self, request))]
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        let start = Instant::now();
        let mut request = Some(request);

        for attempt in 1..=self.retry.max_attempts {
            let last_attempt = attempt == self.retry.max_attempts;

            let remaining = self.retry.total_budget.saturating_sub(start.elapsed());
            if remaining.is_zero() {
                warn!(attempt, "Total retry budget spent");
                return Err(FetchError::Timeout(self.retry.total_budget));
            }

            // Keep a clone around for the next attempt; bodies used here
            // (query strings, forms) are always cloneable.
            let builder = if last_attempt {
                request.take()
            } else {
                request.as_ref().and_then(RequestBuilder::try_clone)
            };
            let Some(builder) = builder else {
                // Uncloneable body: single attempt only.
                let builder = request.take().expect("request consumed twice");
                return builder.send().await.map_err(FetchError::from);
            };

            // Never let one attempt run past the total budget.
            let builder = if remaining < self.attempt_timeout {
                builder.timeout(remaining)
            } else {
                builder
            };

            match builder.send().await {
                Ok(response) => {
                    let status = response.status();
                    if !RetryPolicy::should_retry_status(status) {
                        debug!(status = %status, attempt, "Response received");
                        return Ok(response);
                    }

                    let retry_after = retry_after_secs(&response);
                    if last_attempt {
                        return Err(final_status_error(status, retry_after));
                    }

                    let delay = retry_after
                        .map(Duration::from_secs)
                        .unwrap_or_else(|| self.retry.delay_for_attempt(attempt));
                    if start.elapsed() + delay > self.retry.total_budget {
                        warn!(status = %status, attempt, "Retry budget exhausted");
                        return Err(final_status_error(status, retry_after));
                    }

                    warn!(status = %status, attempt, delay = ?delay, "Retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(err) if err.is_timeout() || err.is_connect() => {
                    if last_attempt {
                        return Err(FetchError::from(err));
                    }
                    let delay = self.retry.delay_for_attempt(attempt);
                    if start.elapsed() + delay > self.retry.total_budget {
                        return Err(FetchError::from(err));
                    }
                    warn!(error = %err, attempt, delay = ?delay, "Connection error, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(FetchError::from(err)),
            }
        }

        // max_attempts >= 1 guarantees a return inside the loop.
        unreachable!("retry loop exited without a result")
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps an exhausted retryable status into its final error.
fn final_status_error(status: StatusCode, retry_after: Option<u64>) -> FetchError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        FetchError::RateLimited { retry_after }
    } else {
        FetchError::Upstream {
            status: Some(status.as_u16()),
            message: format!("upstream returned {status} after retries"),
        }
    }
}

/// Reads a `Retry-After` header in seconds, when present and numeric.
pub fn retry_after_secs(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn fast_client(max_attempts: u32) -> HttpClient {
        HttpClient::with_settings(&TransportSettings::default().with_retry(
            RetryPolicy::new(max_attempts).with_base_delay(Duration::from_millis(1)),
        ))
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(8),
            total_budget: Duration::from_secs(60),
        };
        // Jitter keeps each delay within (cap/2, cap].
        for attempt in 1..=6 {
            let d = policy.delay_for_attempt(attempt);
            let cap = Duration::from_secs(2u64.pow(attempt - 1).min(8));
            assert!(d <= cap, "attempt {attempt}: {d:?} > {cap:?}");
            assert!(d >= cap / 2, "attempt {attempt}: {d:?} < {:?}", cap / 2);
        }
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(RetryPolicy::should_retry_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(RetryPolicy::should_retry_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(RetryPolicy::should_retry_status(StatusCode::BAD_GATEWAY));
        assert!(!RetryPolicy::should_retry_status(StatusCode::NOT_FOUND));
        assert!(!RetryPolicy::should_retry_status(StatusCode::UNAUTHORIZED));
        assert!(!RetryPolicy::should_retry_status(StatusCode::OK));
    }

    #[tokio::test]
    async fn test_success_needs_one_attempt() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/ok");
                then.status(200).body("fine");
            })
            .await;

        let client = fast_client(5);
        let response = client.execute(client.get(&server.url("/ok"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_five_consecutive_500s_exhaust_budget() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/broken");
                then.status(500);
            })
            .await;

        let client = fast_client(5);
        let err = client
            .execute(client.get(&server.url("/broken")))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Upstream { status: Some(500), .. }));
        mock.assert_hits_async(5).await;
    }

    #[tokio::test]
    async fn test_non_retryable_4xx_fails_immediately() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/missing");
                then.status(404);
            })
            .await;

        let client = fast_client(5);
        // Non-retryable statuses come back as responses for the adapter
        // to map; only one attempt is consumed.
        let response = client
            .execute(client.get(&server.url("/missing")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_rate_limit_exhaustion_reports_retry_after() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/limited");
                then.status(429).header("Retry-After", "0");
            })
            .await;

        let client = fast_client(3);
        let err = client
            .execute(client.get(&server.url("/limited")))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::RateLimited { retry_after: Some(0) }));
    }

    #[tokio::test]
    async fn test_budget_bounds_slow_attempts_not_just_sleeps() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/slow");
                then.status(500).delay(Duration::from_millis(150));
            })
            .await;

        // Five 150ms attempts would run ~750ms; the 250ms budget must
        // clip the in-flight attempt, not only the backoff sleeps.
        let client = HttpClient::with_settings(&TransportSettings::default().with_retry(
            RetryPolicy::new(5)
                .with_base_delay(Duration::from_millis(1))
                .with_total_budget(Duration::from_millis(250)),
        ));

        let start = Instant::now();
        let err = client
            .execute(client.get(&server.url("/slow")))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Timeout(_)), "got {err:?}");
        assert!(
            start.elapsed() < Duration::from_millis(600),
            "budget overrun: {:?}",
            start.elapsed()
        );
    }

    #[tokio::test]
    async fn test_429_then_200_succeeds_within_budget() {
        // httpmock cannot script response sequences, so serve two raw
        // responses from a scratch listener: a 429 then a 200.
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let bodies = [
                "HTTP/1.1 429 Too Many Requests\r\nRetry-After: 0\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                "HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
            ];
            for body in bodies {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                socket.write_all(body.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
        });

        let client = fast_client(5);
        let url = format!("http://{addr}/eventually-ok");
        let response = client.execute(client.get(&url)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), "ok");
    }
}
