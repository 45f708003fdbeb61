//! Webhook verification and typed events.
//!
//! Deliveries carry an HMAC-SHA256 signature of `"<timestamp>.<body>"` in
//! [`SIGNATURE_HEADER`] and the Unix timestamp in [`TIMESTAMP_HEADER`].
//! Verify with [`verify_webhook`] (or a reusable [`WebhookVerifier`]) before
//! trusting the body; [`parse_webhook_payload`] only decodes.

mod event;
mod verify;

#[cfg(test)]
mod event_tests;

pub use event::{WebhookEvent, WebhookEventData, WebhookEventKind, parse_webhook_payload};
pub use verify::{
    DEFAULT_MAX_AGE, VerifyError, WebhookDocument, WebhookVerifier, sign_webhook,
    verify_inbound_webhook, verify_webhook,
};

/// Header carrying the hex signature.
pub const SIGNATURE_HEADER: &str = "X-Webhook-Signature";

/// Header carrying the Unix timestamp the signature covers.
pub const TIMESTAMP_HEADER: &str = "X-Webhook-Timestamp";
