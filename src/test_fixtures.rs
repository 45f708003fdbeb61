//! Shared test fixtures: scripted transports and recording sleepers.

use crate::http::{Engine, HttpClient, HttpError, HttpRequest, HttpResponse};
use crate::time::{Clock, Sleeper};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

pub type Reply = Result<HttpResponse, HttpError>;

/// Builds a response with a JSON (or arbitrary text) body.
pub fn reply(status: u16, body: &str) -> Reply {
    Ok(HttpResponse::new(
        StatusCode::from_u16(status).unwrap(),
        HeaderMap::new(),
        body.as_bytes().to_vec(),
    ))
}

/// Builds a response carrying one extra header.
pub fn reply_with_header(status: u16, name: &'static str, value: &'static str) -> Reply {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(name),
        HeaderValue::from_static(value),
    );
    Ok(HttpResponse::new(
        StatusCode::from_u16(status).unwrap(),
        headers,
        br#"{"error":{"message":"slow down"}}"#.to_vec(),
    ))
}

/// Builds a connection failure.
pub fn connection_refused() -> Reply {
    Err(HttpError::Connection(Box::new(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "connection refused",
    ))))
}

/// Transport returning queued replies in order, then `200 {}` forever.
///
/// Every request is recorded for later inspection.
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    /// Body of the last request parsed as JSON.
    pub fn last_json(&self) -> serde_json::Value {
        let body = self.last_request().body.unwrap_or_default();
        serde_json::from_slice(&body).unwrap()
    }
}

impl HttpClient for ScriptedClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(req);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| reply(200, "{}"))
    }
}

/// Transport whose requests never complete.
#[derive(Default)]
pub struct HangingClient {
    calls: AtomicUsize,
}

impl HangingClient {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HttpClient for HangingClient {
    async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending::<Result<HttpResponse, HttpError>>().await
    }
}

/// Sleeper that records requested delays and returns immediately.
#[derive(Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

/// Clock fixed at a settable Unix timestamp.
pub struct MockClock {
    secs: AtomicI64,
}

impl MockClock {
    pub fn new(initial_secs: i64) -> Self {
        Self {
            secs: AtomicI64::new(initial_secs),
        }
    }
}

impl Clock for MockClock {
    fn now(&self) -> SystemTime {
        let secs = self.secs.load(Ordering::SeqCst);
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs.unsigned_abs())
    }
}

/// Engine over a scripted transport with a recording sleeper.
pub fn scripted_engine(
    replies: Vec<Reply>,
) -> (
    Engine<Arc<ScriptedClient>, RecordingSleeper>,
    Arc<ScriptedClient>,
    RecordingSleeper,
) {
    let client = ScriptedClient::new(replies);
    let sleeper = RecordingSleeper::default();
    let engine = Engine::new(Arc::clone(&client), "sk_test_fixture").with_sleeper(sleeper.clone());
    (engine, client, sleeper)
}

/// Client over a scripted transport.
pub fn scripted_client(
    replies: Vec<Reply>,
) -> (
    crate::Client<Arc<ScriptedClient>, RecordingSleeper>,
    Arc<ScriptedClient>,
) {
    let (engine, client, _) = scripted_engine(replies);
    (crate::Client::from_engine(engine), client)
}
