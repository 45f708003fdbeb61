//! One exchange with the SendPigeon API, as seen by a transport.
//!
//! The engine builds a fully shaped [`HttpRequest`] (absolute URL, auth and
//! content headers, encoded JSON) for every attempt and hands it to an
//! [`HttpClient`]. Transports never retry or classify; they only move bytes.

use std::future::Future;
use std::sync::Arc;

use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use url::Url;

use super::HttpError;

/// A single attempt, ready to put on the wire.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// Base URL joined with the API path and query
    pub url: Url,
    pub headers: HeaderMap,
    /// Encoded JSON, absent for GET, DELETE and bodiless POSTs
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Starts a request with no headers and no body.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Attaches an encoded body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets a header. A later value for the same name wins, so caller
    /// headers such as `Idempotency-Key` can follow the engine defaults.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// What the API answered, body read in full.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    /// Consulted for `Retry-After`
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub const fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// 2xx responses are decoded; everything else becomes an API error.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body as text for debug logging; `None` for non UTF-8 bodies.
    #[must_use]
    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Moves one [`HttpRequest`] to the API and back.
///
/// [`ReqwestClient`](super::ReqwestClient) is the production transport.
/// Tests script replies instead of opening sockets.
///
/// # Example
///
/// ```
/// use sendpigeon::http::{HttpClient, HttpError, HttpRequest, HttpResponse};
///
/// struct Accepted;
///
/// impl HttpClient for Accepted {
///     async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
///         let body = br#"{"id":"em_1","status":"pending"}"#.to_vec();
///         Ok(HttpResponse::new(http::StatusCode::OK, http::HeaderMap::new(), body))
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Performs the exchange.
    ///
    /// # Errors
    ///
    /// [`HttpError::Connection`] when no response arrived,
    /// [`HttpError::Timeout`] when the transport gave up waiting,
    /// [`HttpError::InvalidUrl`] for a URL the transport cannot use, and
    /// [`HttpError::Body`] when the status arrived but the body could not be
    /// read.
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, HttpError>> + Send;
}

/// Lets one transport back several clients.
impl<T: HttpClient> HttpClient for Arc<T> {
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, HttpError>> + Send {
        (**self).request(req)
    }
}
