//! SendPigeon: client library for the SendPigeon email API.
//!
//! Sends transactional and batch email, manages templates, domains, API
//! keys, contacts, broadcasts, suppressions and tracking defaults, and
//! verifies signed webhook deliveries.
//!
//! Every call goes through one [`http::Engine`], which authenticates,
//! retries rate-limited and transient failures with backoff, and classifies
//! the outcome as exactly one [`Error`] kind.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod resources;
pub mod time;
pub mod webhook;

#[cfg(test)]
mod test_fixtures;

pub use client::{Client, ClientOptions};
pub use error::{Error, ErrorKind};
pub use resources::{ListOptions, ListResponse, SendEmailRequest, SendEmailResponse};
pub use webhook::{
    VerifyError, WebhookVerifier, parse_webhook_payload, verify_inbound_webhook, verify_webhook,
};
