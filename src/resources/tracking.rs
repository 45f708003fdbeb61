//! Organization-wide open and click tracking defaults.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::http::{ApiRequest, Engine, HttpClient, ReqwestClient};
use crate::time::{Sleeper, TokioSleeper};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingDefaults {
    pub track_opens: bool,
    pub track_clicks: bool,
    /// Skips tracking for recipients who opted out.
    pub privacy_mode: bool,
}

/// Partial update; unset fields are left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTrackingDefaultsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_opens: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_clicks: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy_mode: Option<bool>,
}

/// Tracking operations. Obtained from
/// [`Client::tracking`](crate::Client::tracking).
#[derive(Debug)]
pub struct Tracking<'a, H = ReqwestClient, S = TokioSleeper> {
    engine: &'a Engine<H, S>,
}

impl<'a, H: HttpClient, S: Sleeper> Tracking<'a, H, S> {
    pub(crate) const fn new(engine: &'a Engine<H, S>) -> Self {
        Self { engine }
    }

    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn get_defaults(&self) -> Result<TrackingDefaults, Error> {
        self.engine
            .execute_json(&ApiRequest::get("/v1/tracking/defaults"))
            .await
    }

    /// # Errors
    ///
    /// Returns [`Error`] if the call fails or the response cannot be decoded.
    pub async fn update_defaults(
        &self,
        request: &UpdateTrackingDefaultsRequest,
    ) -> Result<TrackingDefaults, Error> {
        self.engine
            .execute_json(&ApiRequest::patch("/v1/tracking/defaults").with_body(request))
            .await
    }
}
