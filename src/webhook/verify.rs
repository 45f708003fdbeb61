//! Signature and freshness verification of webhook deliveries.

use hmac::{Hmac, Mac};
use serde_json::{Map, Value};
use sha2::Sha256;
use thiserror::Error;

use crate::time::{Clock, SystemClock};

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted age of a delivery, in seconds.
pub const DEFAULT_MAX_AGE: i64 = 300;

/// Decoded body of a verified delivery.
pub type WebhookDocument = Map<String, Value>;

/// Why a delivery was rejected.
///
/// The display strings are stable and safe to branch on or return to the
/// sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// The timestamp header is not a base-10 integer.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// The timestamp is further than the maximum age from now, in either
    /// direction.
    #[error("Timestamp too old")]
    TimestampTooOld,

    /// The signature does not match the payload.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The payload is not a JSON object.
    #[error("Invalid JSON payload")]
    InvalidJson,
}

impl VerifyError {
    /// Returns the stable reason string.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::InvalidTimestamp => "Invalid timestamp",
            Self::TimestampTooOld => "Timestamp too old",
            Self::InvalidSignature => "Invalid signature",
            Self::InvalidJson => "Invalid JSON payload",
        }
    }
}

/// Verifies webhook deliveries against a shared secret.
///
/// Checks run in a fixed order and stop at the first failure: timestamp
/// syntax, timestamp freshness, HMAC-SHA256 signature (constant-time), and
/// finally JSON decoding of the payload.
///
/// # Type Parameters
///
/// - `C`: Clock used for the freshness check (defaults to [`SystemClock`])
///
/// # Example
///
/// ```
/// use sendpigeon::webhook::{WebhookVerifier, sign_webhook};
/// use sendpigeon::time::{Clock, SystemClock};
///
/// let payload = br#"{"event":"webhook.test"}"#;
/// let timestamp = SystemClock.unix_seconds().to_string();
/// let signature = sign_webhook(payload, &timestamp, "whsec_xxx");
///
/// let verifier = WebhookVerifier::new("whsec_xxx");
/// let document = verifier.verify(payload, &signature, &timestamp).unwrap();
/// assert_eq!(document["event"], "webhook.test");
/// ```
#[derive(Clone)]
pub struct WebhookVerifier<C = SystemClock> {
    secret: String,
    max_age: u64,
    clock: C,
}

impl WebhookVerifier<SystemClock> {
    /// Creates a verifier with the default maximum age.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            max_age: DEFAULT_MAX_AGE.unsigned_abs(),
            clock: SystemClock,
        }
    }
}

impl<C> WebhookVerifier<C> {
    /// Sets the maximum age in seconds. Zero or negative selects
    /// [`DEFAULT_MAX_AGE`].
    #[must_use]
    pub const fn with_max_age(mut self, max_age: i64) -> Self {
        let effective = if max_age <= 0 {
            DEFAULT_MAX_AGE
        } else {
            max_age
        };
        self.max_age = effective.unsigned_abs();
        self
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> WebhookVerifier<C2> {
        WebhookVerifier {
            secret: self.secret,
            max_age: self.max_age,
            clock,
        }
    }

    /// Returns the maximum age in seconds.
    #[must_use]
    pub const fn max_age(&self) -> u64 {
        self.max_age
    }
}

impl<C: Clock> WebhookVerifier<C> {
    /// Verifies one delivery and returns its decoded JSON object.
    ///
    /// `signature` and `timestamp` are the raw values of the
    /// [`SIGNATURE_HEADER`](super::SIGNATURE_HEADER) and
    /// [`TIMESTAMP_HEADER`](super::TIMESTAMP_HEADER) headers.
    ///
    /// # Errors
    ///
    /// Returns the first [`VerifyError`] encountered.
    pub fn verify(
        &self,
        payload: &[u8],
        signature: &str,
        timestamp: &str,
    ) -> Result<WebhookDocument, VerifyError> {
        let result = self.check(payload, signature, timestamp);
        if let Err(reason) = &result {
            tracing::debug!(reason = reason.reason(), "Webhook rejected");
        }
        result
    }

    fn check(
        &self,
        payload: &[u8],
        signature: &str,
        timestamp: &str,
    ) -> Result<WebhookDocument, VerifyError> {
        let sent_at: i64 = timestamp
            .parse()
            .map_err(|_| VerifyError::InvalidTimestamp)?;

        if self.clock.unix_seconds().abs_diff(sent_at) > self.max_age {
            return Err(VerifyError::TimestampTooOld);
        }

        // Only the exact lowercase text produced by `sign_webhook` matches.
        if !signature.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(VerifyError::InvalidSignature);
        }
        let supplied = hex::decode(signature).map_err(|_| VerifyError::InvalidSignature)?;
        signing_mac(payload, timestamp, &self.secret)
            .verify_slice(&supplied)
            .map_err(|_| VerifyError::InvalidSignature)?;

        serde_json::from_slice(payload).map_err(|_| VerifyError::InvalidJson)
    }
}

impl<C> std::fmt::Debug for WebhookVerifier<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("secret", &"***")
            .field("max_age", &self.max_age)
            .finish_non_exhaustive()
    }
}

/// Verifies a delivery-status webhook using the system clock.
///
/// `max_age` is in seconds; zero or negative selects [`DEFAULT_MAX_AGE`].
///
/// # Errors
///
/// Returns the first [`VerifyError`] encountered.
pub fn verify_webhook(
    payload: &[u8],
    signature: &str,
    timestamp: &str,
    secret: &str,
    max_age: i64,
) -> Result<WebhookDocument, VerifyError> {
    WebhookVerifier::new(secret)
        .with_max_age(max_age)
        .verify(payload, signature, timestamp)
}

/// Verifies an inbound-email webhook. Identical to [`verify_webhook`].
///
/// # Errors
///
/// Returns the first [`VerifyError`] encountered.
pub fn verify_inbound_webhook(
    payload: &[u8],
    signature: &str,
    timestamp: &str,
    secret: &str,
    max_age: i64,
) -> Result<WebhookDocument, VerifyError> {
    verify_webhook(payload, signature, timestamp, secret, max_age)
}

/// Computes the lowercase hex signature of `"<timestamp>.<payload>"`.
///
/// This is the value the service sends in the signature header.
#[must_use]
pub fn sign_webhook(payload: &[u8], timestamp: &str, secret: &str) -> String {
    hex::encode(signing_mac(payload, timestamp, secret).finalize().into_bytes())
}

fn signing_mac(payload: &[u8], timestamp: &str, secret: &str) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    mac
}
