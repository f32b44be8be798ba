//! Shared fixtures for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::net::transport::{ApiRequest, ApiResponse, Transport, TransportError};
use crate::net::types::User;

pub const BASE_URL: &str = "http://api.test";

/// Transport that records every request and replays queued outcomes in order.
/// An empty queue yields a network error.
#[derive(Default)]
pub struct ScriptedTransport {
    outcomes: RefCell<VecDeque<Result<ApiResponse, TransportError>>>,
    requests: RefCell<Vec<ApiRequest>>,
    on_send: RefCell<Option<Box<dyn Fn()>>>,
}

impl ScriptedTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: serde_json::Value) {
        self.outcomes
            .borrow_mut()
            .push_back(Ok(ApiResponse::new(status, body.to_string())));
    }

    pub fn respond_raw(&self, status: u16, body: &str) {
        self.outcomes
            .borrow_mut()
            .push_back(Ok(ApiResponse::new(status, body)));
    }

    pub fn fail(&self, err: TransportError) {
        self.outcomes.borrow_mut().push_back(Err(err));
    }

    /// Run `hook` while each request is "in flight", before its outcome lands.
    pub fn on_send(&self, hook: impl Fn() + 'static) {
        *self.on_send.borrow_mut() = Some(Box::new(hook));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.borrow_mut().push(request);
        if let Some(hook) = self.on_send.borrow().as_ref() {
            hook();
        }
        self.outcomes
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted response".to_owned())))
    }
}

pub fn user_json() -> serde_json::Value {
    serde_json::json!({
        "id": "u1",
        "name": "Ada Lovelace",
        "email": "a@b.com",
        "planType": "free"
    })
}

pub fn sample_user() -> User {
    serde_json::from_value(user_json()).unwrap()
}

pub fn auth_body(token: &str) -> serde_json::Value {
    serde_json::json!({ "token": token, "user": user_json() })
}
