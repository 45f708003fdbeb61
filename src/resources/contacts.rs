//! Contacts (audience members for broadcasts).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::http::{ApiRequest, Engine, HttpClient, ReqwestClient};
use crate::time::{Sleeper, TokioSleeper};

use super::list::{ListOptions, ListResponse};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// `active`, `unsubscribed`, `bounced` or `complained`.
    pub status: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsubscribed_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactRequest {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

/// One entry of [`Contacts::batch`]. Existing contacts are updated.
pub type BatchContactInput = CreateContactRequest;

/// Partial update; unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Replaces the tag set when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchContactResponse {
    pub created: u64,
    pub updated: u64,
    pub failed: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<serde_json::Value>,
}

/// Audience counts by status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudienceStats {
    pub total: u64,
    pub active: u64,
    pub unsubscribed: u64,
    pub bounced: u64,
    pub complained: u64,
}

/// Filters for [`Contacts::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListContactsOptions {
    pub page: ListOptions,
    /// Contacts carrying any of these tags.
    pub tags: Vec<String>,
    pub status: Option<String>,
    /// Free-text match on email and name.
    pub search: Option<String>,
}

impl ListContactsOptions {
    fn to_path(&self) -> String {
        let tags = self.tags.join(",");
        self.page
            .to_query()
            .text("tags", Some(tags.as_str()))
            .text("status", self.status.as_deref())
            .text("search", self.search.as_deref())
            .append_to("/v1/contacts")
    }
}

#[derive(Deserialize)]
struct TagList {
    #[serde(default)]
    data: Vec<String>,
}

#[derive(Serialize)]
struct BatchBody<'a> {
    contacts: &'a [BatchContactInput],
}

/// Contact operations. Obtained from
/// [`Client::contacts`](crate::Client::contacts).
#[derive(Debug)]
pub struct Contacts<'a, H = ReqwestClient, S = TokioSleeper> {
    engine: &'a Engine<H, S>,
}

impl<'a, H: HttpClient, S: Sleeper> Contacts<'a, H, S> {
    pub(crate) const fn new(engine: &'a Engine<H, S>) -> Self {
        Self { engine }
    }

    /// Lists contacts.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn list(&self, options: &ListContactsOptions) -> Result<ListResponse<Contact>, Error> {
        self.engine
            .execute_json(&ApiRequest::get(options.to_path()))
            .await
    }

    /// Returns audience counts.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn stats(&self) -> Result<AudienceStats, Error> {
        self.engine
            .execute_json(&ApiRequest::get("/v1/contacts/stats"))
            .await
    }

    /// Returns every tag in use.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn tags(&self) -> Result<Vec<String>, Error> {
        let list: TagList = self
            .engine
            .execute_json(&ApiRequest::get("/v1/contacts/tags"))
            .await?;
        Ok(list.data)
    }

    /// Creates a contact.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn create(&self, request: &CreateContactRequest) -> Result<Contact, Error> {
        self.engine
            .execute_json(&ApiRequest::post("/v1/contacts").with_body(request))
            .await
    }

    /// Creates or updates many contacts in one call.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn batch(
        &self,
        contacts: &[BatchContactInput],
    ) -> Result<BatchContactResponse, Error> {
        let body = BatchBody { contacts };
        self.engine
            .execute_json(&ApiRequest::post("/v1/contacts/batch").with_body(&body))
            .await
    }

    /// Fetches one contact.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn get(&self, id: &str) -> Result<Contact, Error> {
        self.engine
            .execute_json(&ApiRequest::get(format!("/v1/contacts/{id}")))
            .await
    }

    /// Updates a contact.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn update(&self, id: &str, request: &UpdateContactRequest) -> Result<Contact, Error> {
        self.engine
            .execute_json(&ApiRequest::patch(format!("/v1/contacts/{id}")).with_body(request))
            .await
    }

    /// Deletes a contact.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        self.engine.delete(&format!("/v1/contacts/{id}")).await?;
        Ok(())
    }

    /// Marks a contact as unsubscribed.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn unsubscribe(&self, id: &str) -> Result<Contact, Error> {
        self.engine
            .execute_json(&ApiRequest::post(format!("/v1/contacts/{id}/unsubscribe")))
            .await
    }

    /// Re-activates an unsubscribed contact.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn resubscribe(&self, id: &str) -> Result<Contact, Error> {
        self.engine
            .execute_json(&ApiRequest::post(format!("/v1/contacts/{id}/resubscribe")))
            .await
    }
}
