//! Request engine: authenticated JSON calls with bounded retries.

use std::time::Duration;

use http::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::time::Instant;
use url::Url;

use crate::error::Error;
use crate::time::{Sleeper, TokioSleeper};

use super::{ApiKey, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestClient, RetryPolicy};

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.sendpigeon.dev";

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client identifier sent as `User-Agent`.
pub const CLIENT_USER_AGENT: &str = concat!("sendpigeon-rust/", env!("CARGO_PKG_VERSION"));

/// Parses [`DEFAULT_BASE_URL`].
///
/// # Panics
///
/// Never; the constant is a valid absolute URL.
#[must_use]
pub fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid URL")
}

/// Description of one logical API call.
///
/// `path` is appended to the engine's base URL and may carry a query
/// string. The body is borrowed and serialized afresh for every attempt.
///
/// # Example
///
/// ```
/// use sendpigeon::http::ApiRequest;
/// use http::{HeaderName, HeaderValue};
///
/// let body = serde_json::json!({ "name": "example.com" });
/// let request = ApiRequest::post("/v1/domains")
///     .with_body(&body)
///     .with_header(
///         HeaderName::from_static("idempotency-key"),
///         HeaderValue::from_static("create-example-com"),
///     );
/// assert_eq!(request.path(), "/v1/domains");
/// ```
#[derive(Debug, Clone)]
pub struct ApiRequest<'a, B: ?Sized = ()> {
    method: Method,
    path: String,
    body: Option<&'a B>,
    headers: HeaderMap,
    deadline: Option<Instant>,
}

impl ApiRequest<'static> {
    /// Creates a bodiless request.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: HeaderMap::new(),
            deadline: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Creates a PUT request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Creates a PATCH request.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }
}

impl<'a, B: ?Sized> ApiRequest<'a, B> {
    /// Attaches a body to be JSON-encoded.
    #[must_use]
    pub fn with_body<'b, B2: ?Sized>(self, body: &'b B2) -> ApiRequest<'b, B2> {
        ApiRequest {
            method: self.method,
            path: self.path,
            body: Some(body),
            headers: self.headers,
            deadline: self.deadline,
        }
    }

    /// Sets an extra header. Extra headers override the engine's defaults.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Merges extra headers, replacing values of the same name.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Sets a deadline for the whole call, including retries.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the path (with query string, if any).
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&'a B> {
        self.body
    }

    /// Returns the extra headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

/// Executes API calls with authentication, retries and error classification.
///
/// The engine holds only immutable configuration; one instance can serve
/// concurrent calls from many tasks.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation (defaults to [`ReqwestClient`])
/// - `S`: The sleeper used between attempts (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```
/// use sendpigeon::http::{Engine, ReqwestClient, RetryPolicy};
/// use std::time::Duration;
///
/// let engine = Engine::new(ReqwestClient::new(), "sk_test_xxx")
///     .with_timeout(Duration::from_secs(10))
///     .with_retry_policy(RetryPolicy::new().with_max_retries(3));
/// assert_eq!(engine.retry_policy().total_attempts(), 4);
/// ```
#[derive(Debug)]
pub struct Engine<H = ReqwestClient, S = TokioSleeper> {
    client: H,
    sleeper: S,
    api_key: ApiKey,
    base_url: Url,
    timeout: Duration,
    retry_policy: RetryPolicy,
    debug: bool,
}

impl<H> Engine<H, TokioSleeper> {
    /// Creates an engine with default settings.
    ///
    /// Uses [`DEFAULT_BASE_URL`], [`DEFAULT_TIMEOUT`], the default retry
    /// policy, and [`TokioSleeper`] for backoff.
    #[must_use]
    pub fn new(client: H, api_key: impl Into<ApiKey>) -> Self {
        Self {
            client,
            sleeper: TokioSleeper,
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout: DEFAULT_TIMEOUT,
            retry_policy: RetryPolicy::default(),
            debug: false,
        }
    }
}

impl<H, S> Engine<H, S> {
    /// Sets a custom sleeper for retry delays.
    ///
    /// This is primarily useful for testing to avoid actual delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> Engine<H, S2> {
        Engine {
            client: self.client,
            sleeper,
            api_key: self.api_key,
            base_url: self.base_url,
            timeout: self.timeout,
            retry_policy: self.retry_policy,
            debug: self.debug,
        }
    }

    /// Sets the base URL that request paths are appended to.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Sets the per-attempt timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Enables request/response diagnostics in the logs.
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Returns the configured base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the per-attempt timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the configured retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Returns whether diagnostics are enabled.
    #[must_use]
    pub const fn is_debug(&self) -> bool {
        self.debug
    }

    /// Joins `path` onto the base URL.
    fn resolve_url(&self, path: &str) -> Result<Url, Error> {
        let raw = format!("{}{path}", self.base_url.as_str().trim_end_matches('/'));
        Url::parse(&raw).map_err(|e| Error::network(format!("failed to create request: {e}")))
    }

    /// Builds the transport request for one attempt.
    ///
    /// The body is serialized here, once per attempt.
    fn build_request<B: Serialize + ?Sized>(
        &self,
        request: &ApiRequest<'_, B>,
        url: &Url,
    ) -> Result<HttpRequest, Error> {
        let authorization = self
            .api_key
            .bearer_header()
            .ok_or_else(|| Error::network("failed to create request: invalid API key"))?;

        let mut http_request = HttpRequest::new(request.method.clone(), url.clone())
            .with_header(AUTHORIZATION, authorization)
            .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .with_header(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        for (name, value) in &request.headers {
            http_request.headers.insert(name.clone(), value.clone());
        }

        if let Some(body) = request.body {
            let encoded = serde_json::to_vec(body)
                .map_err(|e| Error::network(format!("failed to marshal request body: {e}")))?;
            http_request.body = Some(encoded);
        }

        Ok(http_request)
    }
}

/// What the loop does after an attempt.
enum Step {
    Success(Vec<u8>),
    Fail(Error),
    Retry {
        error: Error,
        delay: Option<Duration>,
    },
}

impl<H: HttpClient, S: Sleeper> Engine<H, S> {
    /// Executes a call and returns the raw 2xx body.
    ///
    /// Makes at most `max_retries + 1` attempts. Connection failures, 429
    /// and 5xx responses are retried after a delay; unreadable bodies are
    /// retried immediately; everything else ends the call.
    ///
    /// # Errors
    ///
    /// - [`Error::Network`] when the transport fails on the last attempt,
    ///   the request cannot be built, or the body cannot be encoded
    /// - [`Error::Api`] for a non-2xx response that is not retried
    /// - [`Error::Timeout`] when the per-attempt timeout or the call
    ///   deadline expires
    pub async fn execute<B>(&self, request: &ApiRequest<'_, B>) -> Result<Vec<u8>, Error>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.resolve_url(&request.path)?;
        let mut last_error: Option<Error> = None;

        for attempt in 0..self.retry_policy.total_attempts() {
            if request.deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(Error::timeout());
            }

            let http_request = self.build_request(request, &url)?;
            tracing::debug!(
                method = %request.method,
                url = %url,
                attempt = attempt + 1,
                "Sending request"
            );
            if self.debug {
                tracing::debug!(
                    body_bytes = http_request.body.as_ref().map_or(0, Vec::len),
                    "Request body"
                );
            }

            let outcome = self.send_attempt(http_request, request.deadline).await;
            match self.classify(outcome, attempt) {
                Step::Success(body) => return Ok(body),
                Step::Fail(error) => return Err(error),
                Step::Retry { error, delay } => {
                    if let Some(delay) = delay {
                        tracing::warn!(
                            attempt = attempt + 1,
                            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            "Request failed, retrying: {error}"
                        );
                        self.sleeper.sleep(delay).await;
                    } else {
                        tracing::warn!(attempt = attempt + 1, "Request failed, retrying: {error}");
                    }
                    last_error = Some(error);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::network("request failed")))
    }

    /// Executes a call and decodes the 2xx body as JSON.
    ///
    /// # Errors
    ///
    /// As [`Engine::execute`], plus [`Error::Network`] when the body does
    /// not decode into `T`.
    pub async fn execute_json<T, B>(&self, request: &ApiRequest<'_, B>) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let body = self.execute(request).await?;
        decode_json(&body)
    }

    /// Issues a GET request.
    ///
    /// # Errors
    ///
    /// See [`Engine::execute`].
    pub async fn get(&self, path: &str) -> Result<Vec<u8>, Error> {
        self.execute(&ApiRequest::get(path)).await
    }

    /// Issues a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`Engine::execute`].
    pub async fn post<B>(&self, path: &str, body: &B) -> Result<Vec<u8>, Error>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.execute(&ApiRequest::post(path).with_body(body)).await
    }

    /// Issues a PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`Engine::execute`].
    pub async fn put<B>(&self, path: &str, body: &B) -> Result<Vec<u8>, Error>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.execute(&ApiRequest::put(path).with_body(body)).await
    }

    /// Issues a PATCH request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`Engine::execute`].
    pub async fn patch<B>(&self, path: &str, body: &B) -> Result<Vec<u8>, Error>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.execute(&ApiRequest::patch(path).with_body(body)).await
    }

    /// Issues a DELETE request.
    ///
    /// # Errors
    ///
    /// See [`Engine::execute`].
    pub async fn delete(&self, path: &str) -> Result<Vec<u8>, Error> {
        self.execute(&ApiRequest::delete(path)).await
    }

    /// Runs one attempt bounded by the timeout and the call deadline.
    async fn send_attempt(
        &self,
        request: HttpRequest,
        deadline: Option<Instant>,
    ) -> Result<HttpResponse, HttpError> {
        // A timeout too large to represent leaves only the call deadline.
        let attempt_deadline = Instant::now().checked_add(self.timeout);
        let effective = match (deadline, attempt_deadline) {
            (Some(call), Some(attempt)) => Some(call.min(attempt)),
            (call, attempt) => call.or(attempt),
        };

        match effective {
            Some(at) => tokio::time::timeout_at(at, self.client.request(request))
                .await
                .unwrap_or(Err(HttpError::Timeout)),
            None => self.client.request(request).await,
        }
    }

    fn classify(&self, outcome: Result<HttpResponse, HttpError>, attempt: u32) -> Step {
        match outcome {
            Ok(response) if response.is_success() => {
                if self.debug {
                    tracing::debug!(
                        status = response.status.as_u16(),
                        body_bytes = response.body.len(),
                        "Response received"
                    );
                }
                Step::Success(response.body)
            }
            Ok(response) => self.classify_status(&response, attempt),
            Err(HttpError::Timeout) => Step::Fail(Error::timeout()),
            Err(HttpError::InvalidUrl(reason)) => {
                Step::Fail(Error::network(format!("failed to create request: {reason}")))
            }
            Err(HttpError::Body(e)) => Step::Retry {
                error: Error::network(format!("failed to read response: {e}")),
                delay: None,
            },
            Err(HttpError::Connection(e)) => {
                let error = Error::network(format!("request failed: {e}"));
                if self.retry_policy.should_retry(attempt) {
                    Step::Retry {
                        error,
                        delay: Some(self.retry_policy.delay_for_retry(attempt)),
                    }
                } else {
                    Step::Fail(error)
                }
            }
        }
    }

    fn classify_status(&self, response: &HttpResponse, attempt: u32) -> Step {
        if self.debug {
            tracing::debug!(
                status = response.status.as_u16(),
                body = response.body_text().unwrap_or("<binary>"),
                "Error response received"
            );
        }

        let error = Error::from_response(response.status, &response.body);

        if RetryPolicy::is_retryable_status(response.status)
            && self.retry_policy.should_retry(attempt)
        {
            let delay = RetryPolicy::retry_after(&response.headers)
                .unwrap_or_else(|| self.retry_policy.delay_for_retry(attempt));
            return Step::Retry {
                error,
                delay: Some(delay),
            };
        }

        Step::Fail(error)
    }
}

/// Decodes a successful response body.
///
/// # Errors
///
/// Returns [`Error::Network`] with `failed to parse response` when the
/// body is not valid JSON for `T`.
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Response decode failed: {e}");
        Error::network("failed to parse response")
    })
}
