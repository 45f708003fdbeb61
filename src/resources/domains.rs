//! Sending domains and their DNS verification.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::http::{ApiRequest, Engine, HttpClient, ReqwestClient};
use crate::time::{Sleeper, TokioSleeper};

use super::list::{ListOptions, ListResponse};

/// Verification state of a domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainStatus {
    Pending,
    Verified,
    TemporaryFailure,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

/// DNS record to publish for verification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsRecord {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Domain {
    pub id: String,
    pub name: String,
    pub status: DomainStatus,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_checked_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failing_since: Option<String>,
}

/// A domain together with the records required to verify it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainWithDnsRecords {
    #[serde(flatten)]
    pub domain: Domain,
    #[serde(default)]
    pub dns_records: Vec<DnsRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainVerificationResult {
    pub verified: bool,
    pub status: DomainStatus,
    pub dns_records: Vec<DnsRecord>,
}

#[derive(Serialize)]
struct CreateDomainBody<'a> {
    name: &'a str,
}

/// Domain operations. Obtained from [`Client::domains`](crate::Client::domains).
#[derive(Debug)]
pub struct Domains<'a, H = ReqwestClient, S = TokioSleeper> {
    engine: &'a Engine<H, S>,
}

impl<'a, H: HttpClient, S: Sleeper> Domains<'a, H, S> {
    pub(crate) const fn new(engine: &'a Engine<H, S>) -> Self {
        Self { engine }
    }

    /// Registers a domain and returns the DNS records to publish.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn create(&self, name: &str) -> Result<DomainWithDnsRecords, Error> {
        let body = CreateDomainBody { name };
        self.engine
            .execute_json(&ApiRequest::post("/v1/domains").with_body(&body))
            .await
    }

    /// Fetches one domain with its DNS records.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn get(&self, id: &str) -> Result<DomainWithDnsRecords, Error> {
        self.engine
            .execute_json(&ApiRequest::get(format!("/v1/domains/{id}")))
            .await
    }

    /// Lists domains.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn list(&self, options: &ListOptions) -> Result<ListResponse<Domain>, Error> {
        let path = options.to_query().append_to("/v1/domains");
        self.engine.execute_json(&ApiRequest::get(path)).await
    }

    /// Re-checks the domain's DNS records.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn verify(&self, id: &str) -> Result<DomainVerificationResult, Error> {
        self.engine
            .execute_json(&ApiRequest::post(format!("/v1/domains/{id}/verify")))
            .await
    }

    /// Removes a domain.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        self.engine.delete(&format!("/v1/domains/{id}")).await?;
        Ok(())
    }
}
