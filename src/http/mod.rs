//! HTTP layer: transport abstraction and the retrying request engine.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`])
//! - Handling HTTP responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production HTTP client implementation ([`ReqwestClient`])
//! - Authenticated API calls with retries ([`Engine`], [`ApiRequest`])
//! - Retry policy configuration ([`RetryPolicy`])

mod api_key;
mod client;
mod engine;
mod error;
mod request;
mod retry;

#[cfg(test)]
mod client_tests;

pub use api_key::ApiKey;
pub use client::ReqwestClient;
pub use engine::{
    ApiRequest, CLIENT_USER_AGENT, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, Engine, decode_json,
    default_base_url,
};
pub use error::HttpError;
pub use request::{HttpClient, HttpRequest, HttpResponse};
pub use retry::RetryPolicy;
