//! Templates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::http::{ApiRequest, Engine, HttpClient, ReqwestClient};
use crate::time::{Sleeper, TokioSleeper};

use super::list::{ListOptions, ListResponse};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub subject: String,
    /// Variable names referenced by the template body.
    pub variables: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest {
    pub name: String,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,
}

/// Partial update; unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateTemplateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Renders a template and sends it to test recipients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestTemplateRequest {
    pub to: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestTemplateResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Template operations. Obtained from
/// [`Client::templates`](crate::Client::templates).
#[derive(Debug)]
pub struct Templates<'a, H = ReqwestClient, S = TokioSleeper> {
    engine: &'a Engine<H, S>,
}

impl<'a, H: HttpClient, S: Sleeper> Templates<'a, H, S> {
    pub(crate) const fn new(engine: &'a Engine<H, S>) -> Self {
        Self { engine }
    }

    /// Creates a draft template.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn create(&self, request: &CreateTemplateRequest) -> Result<Template, Error> {
        self.engine
            .execute_json(&ApiRequest::post("/v1/templates").with_body(request))
            .await
    }

    /// Fetches one template.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn get(&self, id: &str) -> Result<Template, Error> {
        self.engine
            .execute_json(&ApiRequest::get(format!("/v1/templates/{id}")))
            .await
    }

    /// Lists templates.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn list(&self, options: &ListOptions) -> Result<ListResponse<Template>, Error> {
        let path = options.to_query().append_to("/v1/templates");
        self.engine.execute_json(&ApiRequest::get(path)).await
    }

    /// Updates a template.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn update(
        &self,
        id: &str,
        request: &UpdateTemplateRequest,
    ) -> Result<Template, Error> {
        self.engine
            .execute_json(&ApiRequest::patch(format!("/v1/templates/{id}")).with_body(request))
            .await
    }

    /// Deletes a template.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        self.engine.delete(&format!("/v1/templates/{id}")).await?;
        Ok(())
    }

    /// Publishes a template so it can be used for sending.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn publish(&self, id: &str) -> Result<Template, Error> {
        self.engine
            .execute_json(&ApiRequest::post(format!("/v1/templates/{id}/publish")))
            .await
    }

    /// Reverts a template to draft.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn unpublish(&self, id: &str) -> Result<Template, Error> {
        self.engine
            .execute_json(&ApiRequest::post(format!("/v1/templates/{id}/unpublish")))
            .await
    }

    /// Sends a rendered test email.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn test(
        &self,
        id: &str,
        request: &TestTemplateRequest,
    ) -> Result<TestTemplateResponse, Error> {
        self.engine
            .execute_json(&ApiRequest::post(format!("/v1/templates/{id}/test")).with_body(request))
            .await
    }
}
