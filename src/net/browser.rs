//! `gloo-net` transport for the browser build.
//!
//! Each request races a `gloo-timers` timeout; whichever finishes first wins
//! and the loser is dropped.

use futures::future::{Either, select};

use super::transport::{ApiRequest, ApiResponse, Method, RequestBody, Transport, TransportError};

#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserTransport;

#[async_trait::async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let after_ms = request.timeout_ms;
        let millis = u32::try_from(after_ms).unwrap_or(u32::MAX);
        let exchange = Box::pin(exchange(request));
        let timer = Box::pin(gloo_timers::future::TimeoutFuture::new(millis));
        match select(exchange, timer).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => Err(TransportError::Timeout { after_ms }),
        }
    }
}

async fn exchange(request: ApiRequest) -> Result<ApiResponse, TransportError> {
    let mut builder = match request.method {
        Method::Get => gloo_net::http::Request::get(&request.url),
        Method::Post => gloo_net::http::Request::post(&request.url),
    };
    if let Some(value) = request.authorization.as_deref() {
        builder = builder.header("Authorization", value);
    }
    if let Some(content_type) = request.body.content_type() {
        builder = builder.header("Content-Type", content_type);
    }

    let built = match request.body {
        RequestBody::Empty => builder.build(),
        RequestBody::Form(body) | RequestBody::Json(body) => builder.body(body),
    }
    .map_err(|e| TransportError::Encode(e.to_string()))?;

    let resp = built
        .send()
        .await
        .map_err(|e| TransportError::Network(e.to_string()))?;
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| TransportError::Network(e.to_string()))?;
    Ok(ApiResponse { status, body })
}
