//! HTTP transport seam.
//!
//! [`LifelogClient`](super::LifelogClient) never touches the network directly;
//! it hands a [`TransportRequest`] to an [`HttpTransport`] and classifies the
//! [`TransportResponse`] it gets back. [`ReqwestTransport`] is the real
//! implementation; tests substitute scripted doubles.

use std::future::Future;
use std::time::Duration;

use super::error::TransportError;

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// A fully resolved GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// Absolute URL without a query string.
    pub url: String,
    /// Query parameters, in the order they should be sent.
    pub query: Vec<(String, String)>,
    /// Header name/value pairs.
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
}

impl TransportRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Status and raw body text of a completed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Something that can execute a GET request.
///
/// Implementations must be shareable across tasks; whether they are safe to
/// drive concurrently is up to the implementation.
pub trait HttpTransport: Send + Sync {
    fn get(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;
}

/// [`HttpTransport`] backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing client (and its connection pool).
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut url =
            reqwest::Url::parse(&request.url).map_err(|e| TransportError::InvalidUrl {
                url: request.url.clone(),
                reason: e.to_string(),
            })?;
        // query_pairs_mut on an empty list would still leave a trailing '?'
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }

        let mut builder = self.client.get(url).timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let timeout = request.timeout;
        let to_transport_error = |e: reqwest::Error| {
            if e.is_timeout() {
                TransportError::Timeout(timeout)
            } else {
                TransportError::Connection(e.to_string())
            }
        };

        let response = builder.send().await.map_err(to_transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(to_transport_error)?;

        Ok(TransportResponse { status, body })
    }
}
