//! Broadcasts: one message sent to a segment of contacts.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::http::{ApiRequest, Engine, HttpClient, ReqwestClient};
use crate::time::{Sleeper, TokioSleeper};

use super::list::{ListOptions, ListResponse};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Broadcast {
    pub id: String,
    pub name: String,
    pub subject: String,
    /// `draft`, `scheduled`, `sending`, `sent` or `cancelled`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub tags: Vec<String>,
    pub recipient_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBroadcastRequest {
    pub name: String,
    pub subject: String,
    pub from_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Partial update of a draft; unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBroadcastRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Audience targeting for [`Broadcasts::send`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendBroadcastRequest {
    /// Only contacts carrying any of these tags.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include_tags: Vec<String>,
    /// Skip contacts carrying any of these tags.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleBroadcastRequest {
    /// RFC 3339 send time.
    pub scheduled_at: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include_tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestBroadcastRequest {
    pub to: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestBroadcastResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Delivery state of a broadcast for one contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastRecipient {
    pub id: String,
    pub contact_id: String,
    pub email: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opened_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clicked_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastAnalytics {
    pub sent: u64,
    pub delivered: u64,
    pub opened: u64,
    pub clicked: u64,
    pub bounced: u64,
    pub complained: u64,
    pub unsubscribed: u64,
    pub open_rate: f64,
    pub click_rate: f64,
}

/// Filters for [`Broadcasts::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListBroadcastsOptions {
    pub page: ListOptions,
    pub status: Option<String>,
}

/// Filters for [`Broadcasts::recipients`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRecipientsOptions {
    pub page: ListOptions,
    pub status: Option<String>,
}

fn status_path(page: &ListOptions, status: Option<&str>, path: &str) -> String {
    page.to_query().text("status", status).append_to(path)
}

/// Broadcast operations. Obtained from
/// [`Client::broadcasts`](crate::Client::broadcasts).
#[derive(Debug)]
pub struct Broadcasts<'a, H = ReqwestClient, S = TokioSleeper> {
    engine: &'a Engine<H, S>,
}

impl<'a, H: HttpClient, S: Sleeper> Broadcasts<'a, H, S> {
    pub(crate) const fn new(engine: &'a Engine<H, S>) -> Self {
        Self { engine }
    }

    /// Lists broadcasts.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn list(
        &self,
        options: &ListBroadcastsOptions,
    ) -> Result<ListResponse<Broadcast>, Error> {
        let path = status_path(&options.page, options.status.as_deref(), "/v1/broadcasts");
        self.engine.execute_json(&ApiRequest::get(path)).await
    }

    /// Creates a draft broadcast.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn create(&self, request: &CreateBroadcastRequest) -> Result<Broadcast, Error> {
        self.engine
            .execute_json(&ApiRequest::post("/v1/broadcasts").with_body(request))
            .await
    }

    /// Fetches one broadcast.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn get(&self, id: &str) -> Result<Broadcast, Error> {
        self.engine
            .execute_json(&ApiRequest::get(format!("/v1/broadcasts/{id}")))
            .await
    }

    /// Updates a draft.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn update(
        &self,
        id: &str,
        request: &UpdateBroadcastRequest,
    ) -> Result<Broadcast, Error> {
        self.engine
            .execute_json(&ApiRequest::patch(format!("/v1/broadcasts/{id}")).with_body(request))
            .await
    }

    /// Deletes a broadcast.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        self.engine.delete(&format!("/v1/broadcasts/{id}")).await?;
        Ok(())
    }

    /// Copies a broadcast into a new draft.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn duplicate(&self, id: &str) -> Result<Broadcast, Error> {
        self.engine
            .execute_json(&ApiRequest::post(format!("/v1/broadcasts/{id}/duplicate")))
            .await
    }

    /// Lists per-contact delivery state.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn recipients(
        &self,
        id: &str,
        options: &ListRecipientsOptions,
    ) -> Result<ListResponse<BroadcastRecipient>, Error> {
        let path = status_path(
            &options.page,
            options.status.as_deref(),
            &format!("/v1/broadcasts/{id}/recipients"),
        );
        self.engine.execute_json(&ApiRequest::get(path)).await
    }

    /// Sends a broadcast now. Without targeting it goes to every active
    /// contact.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn send(
        &self,
        id: &str,
        targeting: Option<&SendBroadcastRequest>,
    ) -> Result<Broadcast, Error> {
        let request = ApiRequest::post(format!("/v1/broadcasts/{id}/send"));
        match targeting {
            Some(body) => self.engine.execute_json(&request.with_body(body)).await,
            None => self.engine.execute_json(&request).await,
        }
    }

    /// Schedules a broadcast.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn schedule(
        &self,
        id: &str,
        request: &ScheduleBroadcastRequest,
    ) -> Result<Broadcast, Error> {
        self.engine
            .execute_json(
                &ApiRequest::post(format!("/v1/broadcasts/{id}/schedule")).with_body(request),
            )
            .await
    }

    /// Cancels a scheduled broadcast.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn cancel(&self, id: &str) -> Result<Broadcast, Error> {
        self.engine
            .execute_json(&ApiRequest::post(format!("/v1/broadcasts/{id}/cancel")))
            .await
    }

    /// Sends a test copy to the given addresses.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn test(
        &self,
        id: &str,
        request: &TestBroadcastRequest,
    ) -> Result<TestBroadcastResponse, Error> {
        self.engine
            .execute_json(&ApiRequest::post(format!("/v1/broadcasts/{id}/test")).with_body(request))
            .await
    }

    /// Returns engagement counts.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn analytics(&self, id: &str) -> Result<BroadcastAnalytics, Error> {
        self.engine
            .execute_json(&ApiRequest::get(format!("/v1/broadcasts/{id}/analytics")))
            .await
    }
}
