//! API keys.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::http::{ApiRequest, Engine, HttpClient, ReqwestClient};
use crate::time::{Sleeper, TokioSleeper};

use super::list::{ListOptions, ListResponse};

/// Whether a key sends real email or only simulates it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiKeyMode {
    Live,
    Test,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiKeyPermission {
    FullAccess,
    Sending,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Key metadata. The secret itself is only returned on creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiKeyInfo {
    pub id: String,
    pub name: String,
    pub key_prefix: String,
    pub mode: ApiKeyMode,
    pub permission: ApiKeyPermission,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<serde_json::Map<String, serde_json::Value>>,
}

/// A newly created key including its secret.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiKeyWithSecret {
    #[serde(flatten)]
    pub info: ApiKeyInfo,
    #[serde(default)]
    pub key: String,
}

impl std::fmt::Debug for ApiKeyWithSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyWithSecret")
            .field("info", &self.info)
            .field("key", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApiKeyRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ApiKeyMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission: Option<ApiKeyPermission>,
    /// Restricts a sending key to one domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

/// API key operations. Obtained from
/// [`Client::api_keys`](crate::Client::api_keys).
#[derive(Debug)]
pub struct ApiKeys<'a, H = ReqwestClient, S = TokioSleeper> {
    engine: &'a Engine<H, S>,
}

impl<'a, H: HttpClient, S: Sleeper> ApiKeys<'a, H, S> {
    pub(crate) const fn new(engine: &'a Engine<H, S>) -> Self {
        Self { engine }
    }

    /// Creates a key. The returned secret is not retrievable later.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn create(&self, request: &CreateApiKeyRequest) -> Result<ApiKeyWithSecret, Error> {
        self.engine
            .execute_json(&ApiRequest::post("/v1/api-keys").with_body(request))
            .await
    }

    /// Fetches one key's metadata.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn get(&self, id: &str) -> Result<ApiKeyInfo, Error> {
        self.engine
            .execute_json(&ApiRequest::get(format!("/v1/api-keys/{id}")))
            .await
    }

    /// Lists keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn list(&self, options: &ListOptions) -> Result<ListResponse<ApiKeyInfo>, Error> {
        let path = options.to_query().append_to("/v1/api-keys");
        self.engine.execute_json(&ApiRequest::get(path)).await
    }

    /// Revokes a key.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        self.engine.delete(&format!("/v1/api-keys/{id}")).await?;
        Ok(())
    }
}
