//! Transport seam between the HTTP client and the network.
//!
//! DESIGN
//! ======
//! `HttpClient` builds fully-resolved `ApiRequest` values (URL, captured
//! authorization, encoded body) and hands them to a `Transport`. The browser
//! build plugs in `gloo-net`; tests plug in a scripted transport. Futures are
//! `?Send` because everything runs on the single WASM event loop.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use serde::de::DeserializeOwned;

/// HTTP verbs used by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Encoded request payload.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    Empty,
    /// `application/x-www-form-urlencoded`, already encoded.
    Form(String),
    /// `application/json`, already serialized.
    Json(String),
}

impl RequestBody {
    /// Content type to send with this body, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::Empty => None,
            Self::Form(_) => Some("application/x-www-form-urlencoded"),
            Self::Json(_) => Some("application/json"),
        }
    }
}

/// A request ready for dispatch.
///
/// `authorization` is captured when the request is built, so later credential
/// changes never affect a request already in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub authorization: Option<String>,
    pub body: RequestBody,
    pub timeout_ms: u64,
}

/// Status and raw body of a completed response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    /// True for any 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the serde error if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// Best-effort human-readable error text from a failure body.
    ///
    /// Uses the `message`, `detail` or `error` field of a JSON body when
    /// present, otherwise the trimmed raw body.
    #[must_use]
    pub fn error_message(&self) -> String {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&self.body) {
            for key in ["message", "detail", "error"] {
                if let Some(text) = value.get(key).and_then(serde_json::Value::as_str) {
                    return text.to_owned();
                }
            }
        }
        self.body.trim().to_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },
    #[error("request encoding failed: {0}")]
    Encode(String),
}

/// Sends requests over the wire.
#[async_trait::async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Transport used where no network exists (native builds outside tests).
/// Every request fails with a network error.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineTransport;

#[async_trait::async_trait(?Send)]
impl Transport for OfflineTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        Err(TransportError::Network(format!("offline: {}", request.url)))
    }
}
