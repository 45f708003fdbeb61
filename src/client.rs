//! Client facade: sending plus access to every resource service.

use std::time::Duration;

use http::{HeaderName, HeaderValue};
use serde::Serialize;
use url::Url;

use crate::error::Error;
use crate::http::{ApiKey, ApiRequest, Engine, HttpClient, ReqwestClient, RetryPolicy};
use crate::resources::{
    ApiKeys, Broadcasts, Contacts, Domains, Emails, SendBatchResponse, SendEmailRequest,
    SendEmailResponse, Suppressions, Templates, Tracking,
};
use crate::time::{Sleeper, TokioSleeper};

const IDEMPOTENCY_KEY: HeaderName = HeaderName::from_static("idempotency-key");

/// Optional client settings. Unset fields use the defaults.
///
/// # Example
///
/// ```
/// use sendpigeon::ClientOptions;
/// use std::time::Duration;
///
/// let options = ClientOptions::new()
///     .with_timeout(Duration::from_secs(10))
///     .with_max_retries(4);
/// assert_eq!(options.max_retries, Some(4));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOptions {
    /// API endpoint (default [`DEFAULT_BASE_URL`](crate::http::DEFAULT_BASE_URL)).
    pub base_url: Option<Url>,
    /// Per-attempt timeout (default 30 seconds). Zero means default.
    pub timeout: Option<Duration>,
    /// Retries after the first attempt (default 2, at most 5). Negative
    /// means default.
    pub max_retries: Option<i64>,
    /// Logs request and response diagnostics at debug level.
    pub debug: bool,
}

impl ClientOptions {
    /// Creates options that leave every setting at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends requests to another endpoint, such as a local mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Bounds each attempt. A zero duration keeps the default.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the retries after the first attempt; clamped to 0..=5, negative
    /// keeps the default.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: i64) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Logs request and response sizes at debug level.
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Applies these options to an engine.
    fn configure<H, S>(self, mut engine: Engine<H, S>) -> Engine<H, S> {
        if let Some(base_url) = self.base_url {
            engine = engine.with_base_url(base_url);
        }
        if let Some(timeout) = self.timeout.filter(|t| !t.is_zero()) {
            engine = engine.with_timeout(timeout);
        }
        if let Some(max_retries) = self.max_retries {
            engine = engine.with_retry_policy(RetryPolicy::new().with_max_retries(max_retries));
        }
        engine.with_debug(self.debug)
    }
}

/// SendPigeon API client.
///
/// Cheap to share by reference across tasks; every call is independent.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation (defaults to [`ReqwestClient`])
/// - `S`: The sleeper used between retries (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```no_run
/// use sendpigeon::{Client, SendEmailRequest};
///
/// # async fn example() -> Result<(), sendpigeon::Error> {
/// let client = Client::new("sk_live_xxx");
/// let sent = client
///     .send(&SendEmailRequest {
///         to: vec!["user@example.com".into()],
///         from: Some("hello@acme.dev".into()),
///         subject: Some("Welcome".into()),
///         html: Some("<p>Hi there</p>".into()),
///         ..Default::default()
///     })
///     .await?;
/// println!("queued {}", sent.id);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client<H = ReqwestClient, S = TokioSleeper> {
    engine: Engine<H, S>,
}

impl Client {
    /// Creates a client with default settings.
    #[must_use]
    pub fn new(api_key: impl Into<ApiKey>) -> Self {
        Self::with_options(api_key, ClientOptions::default())
    }

    /// Creates a client with custom settings.
    #[must_use]
    pub fn with_options(api_key: impl Into<ApiKey>, options: ClientOptions) -> Self {
        Self::with_transport(ReqwestClient::new(), api_key, options)
    }
}

impl<H> Client<H, TokioSleeper> {
    /// Creates a client over a custom transport.
    #[must_use]
    pub fn with_transport(
        transport: H,
        api_key: impl Into<ApiKey>,
        options: ClientOptions,
    ) -> Self {
        Self {
            engine: options.configure(Engine::new(transport, api_key)),
        }
    }
}

impl<H, S> Client<H, S> {
    /// Wraps a fully configured engine.
    #[must_use]
    pub const fn from_engine(engine: Engine<H, S>) -> Self {
        Self { engine }
    }

    /// Returns the underlying engine.
    #[must_use]
    pub const fn engine(&self) -> &Engine<H, S> {
        &self.engine
    }
}

#[derive(Serialize)]
struct BatchBody<'a> {
    emails: &'a [SendEmailRequest],
}

impl<H: HttpClient, S: Sleeper> Client<H, S> {
    /// Sends one email.
    ///
    /// A set `idempotency_key` is passed as the `Idempotency-Key` header so
    /// a retried send is not delivered twice.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn send(&self, request: &SendEmailRequest) -> Result<SendEmailResponse, Error> {
        let mut api_request = ApiRequest::post("/v1/emails").with_body(request);
        if let Some(key) = request.idempotency_key.as_deref().filter(|k| !k.is_empty()) {
            let value = HeaderValue::from_str(key).map_err(|_| {
                Error::network("failed to create request: invalid idempotency key")
            })?;
            api_request = api_request.with_header(IDEMPOTENCY_KEY, value);
        }
        self.engine.execute_json(&api_request).await
    }

    /// Sends up to 100 emails in one call.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn send_batch(
        &self,
        emails: &[SendEmailRequest],
    ) -> Result<SendBatchResponse, Error> {
        let body = BatchBody { emails };
        self.engine
            .execute_json(&ApiRequest::post("/v1/emails/batch").with_body(&body))
            .await
    }

    /// Sent email lookup, listing and cancellation.
    #[must_use]
    pub const fn emails(&self) -> Emails<'_, H, S> {
        Emails::new(&self.engine)
    }

    /// Template management, publishing and test sends.
    #[must_use]
    pub const fn templates(&self) -> Templates<'_, H, S> {
        Templates::new(&self.engine)
    }

    /// Sending domains and their DNS verification.
    #[must_use]
    pub const fn domains(&self) -> Domains<'_, H, S> {
        Domains::new(&self.engine)
    }

    /// API key management. Secrets are only returned on creation.
    #[must_use]
    pub const fn api_keys(&self) -> ApiKeys<'_, H, S> {
        ApiKeys::new(&self.engine)
    }

    /// Audience contacts, tags and subscription state.
    #[must_use]
    pub const fn contacts(&self) -> Contacts<'_, H, S> {
        Contacts::new(&self.engine)
    }

    /// Broadcast campaigns: drafting, targeting, scheduling and analytics.
    #[must_use]
    pub const fn broadcasts(&self) -> Broadcasts<'_, H, S> {
        Broadcasts::new(&self.engine)
    }

    /// Addresses excluded from future sends.
    #[must_use]
    pub const fn suppressions(&self) -> Suppressions<'_, H, S> {
        Suppressions::new(&self.engine)
    }

    /// Account-wide open and click tracking defaults.
    #[must_use]
    pub const fn tracking(&self) -> Tracking<'_, H, S> {
        Tracking::new(&self.engine)
    }
}
