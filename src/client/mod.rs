//! Client for the Limitless lifelog REST API.
//!
//! [`LifelogClient::list_lifelogs`] performs exactly one authenticated GET
//! against `{base_url}/v1/lifelogs` and returns a [`LifelogPage`], or a
//! [`LifelogFailure`] that tells rate limiting apart from other API errors.
//! [`Pages`] walks the cursor chain one request at a time.

pub mod error;
pub mod transport;
pub mod types;

use std::collections::HashSet;
use std::time::Duration;

use serde_json::Value;

pub use error::{LifelogFailure, Payload, TransportError, STATUS_TOO_MANY_REQUESTS};
pub use transport::{
    HttpTransport, ReqwestTransport, TransportRequest, TransportResponse, API_KEY_HEADER,
};
pub use types::{Direction, LifelogEntry, LifelogPage, ListParams, Timestamp};

pub const DEFAULT_BASE_URL: &str = "https://api.limitless.ai";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const PATH_LIFELOGS: &str = "/v1/lifelogs";
const DEFAULT_RATE_LIMIT_MESSAGE: &str = "Too many requests";
const DEFAULT_API_ERROR_MESSAGE: &str = "Limitless API error";

/// Connection settings captured at construction.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Authenticated lifelog API client, generic over its transport.
pub struct LifelogClient<T = ReqwestTransport> {
    api_key: String,
    base_url: String,
    timeout: Duration,
    transport: T,
}

impl LifelogClient<ReqwestTransport> {
    /// Build a client backed by a fresh `reqwest` connection pool.
    pub fn new(
        api_key: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, LifelogFailure> {
        Self::with_transport(api_key, options, ReqwestTransport::new())
    }
}

impl<T: HttpTransport> LifelogClient<T> {
    /// Build a client around an injected transport.
    ///
    /// Fails with [`LifelogFailure::MissingApiKey`] when the key is empty.
    pub fn with_transport(
        api_key: impl Into<String>,
        options: ClientOptions,
        transport: T,
    ) -> Result<Self, LifelogFailure> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LifelogFailure::MissingApiKey);
        }

        Ok(Self {
            api_key,
            base_url: options.base_url.trim_end_matches('/').to_owned(),
            timeout: options.timeout,
            transport,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch one page of lifelog entries.
    pub async fn list_lifelogs(&self, params: &ListParams) -> Result<LifelogPage, LifelogFailure> {
        let request = TransportRequest {
            url: format!("{}{}", self.base_url, PATH_LIFELOGS),
            query: params.to_pairs(),
            headers: vec![(API_KEY_HEADER.to_owned(), self.api_key.clone())],
            timeout: self.timeout,
        };

        tracing::debug!(
            url = %request.url,
            params = ?params.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            "requesting lifelogs"
        );

        let response = self.transport.get(request).await?;
        let page = classify_response(response)?;

        tracing::debug!(
            entries = page.entries.len(),
            has_next = page.next_cursor.is_some(),
            "lifelogs received"
        );
        Ok(page)
    }

    /// Walk the cursor chain starting from `params`.
    pub fn pages(&self, params: ListParams) -> Pages<'_, T> {
        let seen = params.get("cursor").map(str::to_owned).into_iter().collect();
        Pages {
            client: self,
            params,
            seen,
            done: false,
        }
    }
}

impl<T> std::fmt::Debug for LifelogClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifelogClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Turn a raw response into a page or a typed failure.
pub fn classify_response(response: TransportResponse) -> Result<LifelogPage, LifelogFailure> {
    let TransportResponse { status, body } = response;

    if status == STATUS_TOO_MANY_REQUESTS {
        let payload = decode_payload(&body);
        let message =
            error_message(&payload).unwrap_or_else(|| DEFAULT_RATE_LIMIT_MESSAGE.to_owned());
        let retry_after = extract_retry_after(&payload);
        tracing::warn!(?retry_after, %message, "lifelog API rate limit hit");
        return Err(LifelogFailure::RateLimited {
            status,
            message,
            payload,
            retry_after,
        });
    }

    if status >= 400 {
        let payload = decode_payload(&body);
        let message = error_message(&payload)
            .filter(|m| !m.is_empty())
            .or_else(|| Some(body.clone()).filter(|b| !b.is_empty()))
            .unwrap_or_else(|| DEFAULT_API_ERROR_MESSAGE.to_owned());
        return Err(LifelogFailure::ApiFailure {
            status,
            message,
            payload,
        });
    }

    let data: Value = serde_json::from_str(&body)?;
    Ok(LifelogPage::from_json(&data))
}

/// Decode an error body as a JSON object, or an empty one if that fails.
pub fn decode_payload(body: &str) -> Payload {
    match serde_json::from_str(body) {
        Ok(Value::Object(map)) => map,
        _ => Payload::new(),
    }
}

fn error_message(payload: &Payload) -> Option<String> {
    match payload.get("error")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Read `retryAfter` as whole seconds. Accepts integers, integral floats and
/// numeric strings; anything else is `None`.
pub fn extract_retry_after(payload: &Payload) -> Option<u64> {
    match payload.get("retryAfter")? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Cursor walker returned by [`LifelogClient::pages`].
///
/// Each call to [`Pages::next_page`] issues one request; nothing is
/// prefetched. The walk ends when the server sends no cursor or a cursor
/// already visited, so a cycling server cannot keep it going.
pub struct Pages<'a, T> {
    client: &'a LifelogClient<T>,
    params: ListParams,
    seen: HashSet<String>,
    done: bool,
}

impl<T: HttpTransport> Pages<'_, T> {
    /// Fetch the next page, or `None` once the walk has ended.
    pub async fn next_page(&mut self) -> Result<Option<LifelogPage>, LifelogFailure> {
        if self.done {
            return Ok(None);
        }

        let page = self.client.list_lifelogs(&self.params).await?;
        match page.next_cursor.as_deref() {
            Some(next) if !self.seen.insert(next.to_owned()) => {
                tracing::warn!(cursor = next, "server revisited cursor, stopping pagination");
                self.done = true;
            }
            Some(next) => self.params.set("cursor", Some(next)),
            None => self.done = true,
        }
        Ok(Some(page))
    }

    /// Drain up to `max_pages` pages into one list. The returned cursor is
    /// where a later walk could resume, `None` if the chain was exhausted.
    /// With `max_pages == 0` nothing is fetched and the starting cursor is
    /// returned unchanged.
    pub async fn collect(
        mut self,
        max_pages: usize,
    ) -> Result<(Vec<LifelogEntry>, Option<String>), LifelogFailure> {
        let mut entries = Vec::new();
        let mut cursor = self.params.get("cursor").map(str::to_owned);
        let mut fetched = 0;

        while fetched < max_pages {
            let Some(page) = self.next_page().await? else {
                break;
            };
            fetched += 1;
            entries.extend(page.entries);
            cursor = page.next_cursor;
        }

        if self.done {
            cursor = None;
        }
        Ok((entries, cursor))
    }
}
