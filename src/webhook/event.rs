//! Typed webhook events.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a webhook event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WebhookEventKind {
    /// `email.delivered`
    Delivered,
    /// `email.bounced`
    Bounced,
    /// `email.complained`
    Complained,
    /// `email.opened`
    Opened,
    /// `email.clicked`
    Clicked,
    /// `webhook.test`
    Test,
    /// Any event name this version does not know.
    Unknown(String),
}

impl WebhookEventKind {
    /// Returns the wire name of the event.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Delivered => "email.delivered",
            Self::Bounced => "email.bounced",
            Self::Complained => "email.complained",
            Self::Opened => "email.opened",
            Self::Clicked => "email.clicked",
            Self::Test => "webhook.test",
            Self::Unknown(name) => name,
        }
    }
}

impl From<String> for WebhookEventKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "email.delivered" => Self::Delivered,
            "email.bounced" => Self::Bounced,
            "email.complained" => Self::Complained,
            "email.opened" => Self::Opened,
            "email.clicked" => Self::Clicked,
            "webhook.test" => Self::Test,
            _ => Self::Unknown(name),
        }
    }
}

impl From<WebhookEventKind> for String {
    fn from(kind: WebhookEventKind) -> Self {
        match kind {
            WebhookEventKind::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for WebhookEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event-specific fields. Which ones are present depends on the kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookEventData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Set for `email.bounced`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounce_type: Option<String>,
    /// Set for `email.complained`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complaint_type: Option<String>,
    /// Set for `email.opened`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opened_at: Option<String>,
    /// Set for `email.clicked`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clicked_at: Option<String>,
    /// Set for `email.clicked`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    /// Set for `email.clicked`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_index: Option<i64>,
}

/// A webhook delivery decoded into its typed form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub event: WebhookEventKind,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub data: WebhookEventData,
}

/// Decodes a payload into a [`WebhookEvent`].
///
/// This performs no authentication. Verify the delivery with
/// [`verify_webhook`](super::verify_webhook) first.
///
/// # Errors
///
/// Returns the JSON error when the payload does not have the event shape.
pub fn parse_webhook_payload(payload: &[u8]) -> Result<WebhookEvent, serde_json::Error> {
    serde_json::from_slice(payload)
}
