//! Shared HTTP client carrying the process-wide bearer credential.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `HttpClient` is built at startup and cloned into every collaborator
//! that talks to the API. Clones share a single credential cell, so once the
//! session attaches a token every later request from any clone carries
//! `Authorization: Bearer <token>`. Only the session module writes the cell.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use super::transport::{ApiRequest, ApiResponse, Method, RequestBody, Transport, TransportError};

#[derive(Clone)]
pub struct HttpClient {
    base_url: Rc<str>,
    timeout_ms: u64,
    transport: Rc<dyn Transport>,
    credential: Rc<RefCell<Option<String>>>,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("has_credential", &self.has_credential())
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    #[must_use]
    pub fn new(base_url: &str, timeout_ms: u64, transport: Rc<dyn Transport>) -> Self {
        Self {
            base_url: Rc::from(base_url.trim_end_matches('/')),
            timeout_ms,
            transport,
            credential: Rc::new(RefCell::new(None)),
        }
    }

    /// Whether a bearer credential is currently attached.
    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.credential.borrow().is_some()
    }

    /// The `Authorization` header value new requests will carry.
    #[must_use]
    pub fn authorization_header(&self) -> Option<String> {
        self.credential
            .borrow()
            .as_deref()
            .map(|token| format!("Bearer {token}"))
    }

    pub(crate) fn attach_credential(&self, token: &str) {
        *self.credential.borrow_mut() = Some(token.to_owned());
    }

    pub(crate) fn detach_credential(&self) {
        self.credential.borrow_mut().take();
    }

    /// Absolute URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `GET` an API path.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the request never produced a response.
    pub async fn get(&self, path: &str) -> Result<ApiResponse, TransportError> {
        self.dispatch(Method::Get, path, RequestBody::Empty).await
    }

    /// `POST` a form-encoded body built from `fields`, in order.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the request never produced a response.
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Result<ApiResponse, TransportError> {
        self.dispatch(Method::Post, path, RequestBody::Form(encode_form(fields))).await
    }

    /// `POST` a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `Encode` if `body` cannot be serialized, otherwise the
    /// transport error if the request never produced a response.
    pub async fn post_json<T: Serialize>(&self, path: &str, body: &T) -> Result<ApiResponse, TransportError> {
        let json = serde_json::to_string(body).map_err(|e| TransportError::Encode(e.to_string()))?;
        self.dispatch(Method::Post, path, RequestBody::Json(json)).await
    }

    async fn dispatch(&self, method: Method, path: &str, body: RequestBody) -> Result<ApiResponse, TransportError> {
        let request = ApiRequest {
            method,
            url: self.url(path),
            authorization: self.authorization_header(),
            body,
            timeout_ms: self.timeout_ms,
        };
        self.transport.send(request).await
    }
}

/// Encode `key=value` pairs as `application/x-www-form-urlencoded`.
pub(crate) fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}
