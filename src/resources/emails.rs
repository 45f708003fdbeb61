//! Emails: sending, lookup, listing and cancellation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::http::{ApiRequest, Engine, HttpClient, ReqwestClient};
use crate::time::{Sleeper, TokioSleeper};

use super::list::{ListOptions, ListResponse};

/// Delivery status of an email.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailStatus {
    Scheduled,
    Cancelled,
    Pending,
    Sent,
    Delivered,
    Bounced,
    Complained,
    Failed,
    /// A status this version does not know.
    #[default]
    #[serde(other)]
    Unknown,
}

impl EmailStatus {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Cancelled => "cancelled",
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Bounced => "bounced",
            Self::Complained => "complained",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

/// File attached to an outgoing email.
///
/// Supply either base64 `content` or a fetchable `path`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// Attachment metadata reported for a sent email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentMeta {
    pub filename: String,
    pub size: u64,
    pub content_type: String,
}

/// Request to send one email.
///
/// `idempotency_key` is sent as the `Idempotency-Key` header, never in the
/// body.
///
/// # Example
///
/// ```
/// use sendpigeon::resources::SendEmailRequest;
///
/// let request = SendEmailRequest {
///     to: vec!["user@example.com".into()],
///     from: Some("hello@acme.dev".into()),
///     subject: Some("Welcome".into()),
///     html: Some("<p>Hi</p>".into()),
///     idempotency_key: Some("welcome-42".into()),
///     ..Default::default()
/// };
/// let body = serde_json::to_value(&request).unwrap();
/// assert!(body.get("idempotency_key").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    pub to: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub cc: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub bcc: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub variables: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub headers: BTreeMap<String, String>,
    #[serde(rename = "scheduled_at", skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<String>,
    #[serde(skip)]
    pub idempotency_key: Option<String>,
}

/// Result of sending one email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SendEmailResponse {
    pub id: String,
    pub status: EmailStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<String>,
    /// Recipients dropped because they are suppressed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suppressed: Vec<String>,
}

/// Outcome of one email within a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchEmailResult {
    pub index: u32,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suppressed: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,
}

/// Result of a batch send.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SendBatchResponse {
    pub data: Vec<BatchEmailResult>,
    pub summary: serde_json::Map<String, serde_json::Value>,
}

/// Full record of a sent or scheduled email.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailDetail {
    pub id: String,
    pub from_address: String,
    pub to_address: String,
    pub subject: String,
    pub status: EmailStatus,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bcc_address: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounced_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complained_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounce_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complaint_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentMeta>,
    pub has_body: bool,
}

/// Filters for [`Emails::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListEmailsOptions {
    pub page: ListOptions,
    pub status: Option<EmailStatus>,
    pub tag: Option<String>,
}

impl ListEmailsOptions {
    fn to_path(&self) -> String {
        self.page
            .to_query()
            .text("status", self.status.map(EmailStatus::as_str))
            .text("tag", self.tag.as_deref())
            .append_to("/v1/emails")
    }
}

/// Email operations. Obtained from [`Client::emails`](crate::Client::emails).
#[derive(Debug)]
pub struct Emails<'a, H = ReqwestClient, S = TokioSleeper> {
    engine: &'a Engine<H, S>,
}

impl<'a, H: HttpClient, S: Sleeper> Emails<'a, H, S> {
    pub(crate) const fn new(engine: &'a Engine<H, S>) -> Self {
        Self { engine }
    }

    /// Fetches one email.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn get(&self, id: &str) -> Result<EmailDetail, Error> {
        self.engine
            .execute_json(&ApiRequest::get(format!("/v1/emails/{id}")))
            .await
    }

    /// Lists emails, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn list(
        &self,
        options: &ListEmailsOptions,
    ) -> Result<ListResponse<EmailDetail>, Error> {
        self.engine
            .execute_json(&ApiRequest::get(options.to_path()))
            .await
    }

    /// Cancels a scheduled email.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn cancel(&self, id: &str) -> Result<EmailDetail, Error> {
        self.engine
            .execute_json(&ApiRequest::post(format!("/v1/emails/{id}/cancel")))
            .await
    }
}
