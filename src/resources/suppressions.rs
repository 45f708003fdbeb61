//! Suppression list: addresses that are never sent to.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::http::{ApiRequest, Engine, HttpClient, ReqwestClient};
use crate::time::{Sleeper, TokioSleeper};

use super::list::{ListOptions, ListResponse, Query, encode_segment};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Suppression {
    pub email: String,
    /// `bounce`, `complaint` or `manual`.
    pub reason: String,
    pub created_at: String,
}

/// Suppression operations. Obtained from
/// [`Client::suppressions`](crate::Client::suppressions).
#[derive(Debug)]
pub struct Suppressions<'a, H = ReqwestClient, S = TokioSleeper> {
    engine: &'a Engine<H, S>,
}

impl<'a, H: HttpClient, S: Sleeper> Suppressions<'a, H, S> {
    pub(crate) const fn new(engine: &'a Engine<H, S>) -> Self {
        Self { engine }
    }

    /// Lists suppressed addresses. Only `limit` and `offset` apply; the
    /// cursor is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn list(&self, options: &ListOptions) -> Result<ListResponse<Suppression>, Error> {
        let path = Query::new()
            .number("limit", options.limit)
            .number("offset", options.offset)
            .append_to("/v1/suppressions");
        self.engine.execute_json(&ApiRequest::get(path)).await
    }

    /// Removes an address from the list.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the call fails.
    pub async fn delete(&self, email: &str) -> Result<(), Error> {
        let path = format!("/v1/suppressions/{}", encode_segment(email));
        self.engine.delete(&path).await?;
        Ok(())
    }
}
