#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::Router;
use lifelog::client::{
    ClientOptions, HttpTransport, LifelogClient, ReqwestTransport, TransportError,
    TransportRequest, TransportResponse,
};

pub const API_KEY: &str = "test-key";

/// The canned success body from `tests/data/lifelogs_sample.json`.
pub fn sample_body() -> String {
    std::fs::read_to_string(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/data/lifelogs_sample.json"
    ))
    .unwrap()
}

/// Transport that replays scripted responses and records every request.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<TransportResponse>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub fn new(responses: impl IntoIterator<Item = TransportResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(status: u16, body: impl Into<String>) -> Self {
        Self::new([TransportResponse::new(status, body)])
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> TransportRequest {
        self.requests().pop().expect("no request was made")
    }
}

impl HttpTransport for MockTransport {
    async fn get(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        let next = self.responses.lock().unwrap().pop_front();
        next.ok_or_else(|| TransportError::Connection("no scripted response left".into()))
    }
}

/// Client over a [`MockTransport`] with the given scripted responses.
pub fn mock_client(
    responses: impl IntoIterator<Item = TransportResponse>,
) -> LifelogClient<MockTransport> {
    LifelogClient::with_transport(
        API_KEY,
        options("https://api.limitless.ai"),
        MockTransport::new(responses),
    )
    .unwrap()
}

/// Client over the real reqwest transport, bypassing any proxy settings from
/// the environment so loopback requests stay local.
pub fn http_client(base_url: &str) -> LifelogClient<ReqwestTransport> {
    let inner = reqwest::Client::builder().no_proxy().build().unwrap();
    LifelogClient::with_transport(API_KEY, options(base_url), ReqwestTransport::from_client(inner))
        .unwrap()
}

pub fn options(base_url: &str) -> ClientOptions {
    ClientOptions {
        base_url: base_url.into(),
        timeout: Duration::from_secs(5),
    }
}

/// What the fake server saw for one request.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub api_key: Option<String>,
    pub raw_query: Option<String>,
}

#[derive(Clone)]
struct FakeState {
    status: StatusCode,
    body: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

/// A local HTTP server standing in for the lifelog API. Every request to
/// `/v1/lifelogs` gets the same status and body.
pub struct FakeApi {
    pub addr: SocketAddr,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl FakeApi {
    pub async fn start(status: u16, body: impl Into<String>) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.into(),
            seen: seen.clone(),
        };

        let app = Router::new()
            .route("/v1/lifelogs", get(lifelogs_handler))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, seen }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

async fn lifelogs_handler(
    State(state): State<FakeState>,
    headers: HeaderMap,
    RawQuery(raw_query): RawQuery,
) -> (StatusCode, String) {
    let api_key = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    state.seen.lock().unwrap().push(SeenRequest { api_key, raw_query });
    (state.status, state.body.clone())
}
