//! Canned-response network client for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use runner_interface::{NetworkClient, NetworkRequest, NetworkResponse};

#[derive(Default)]
pub(crate) struct FakeClient {
    replies: Mutex<VecDeque<Result<NetworkResponse, String>>>,
    requests: Mutex<Vec<NetworkRequest>>,
}

impl FakeClient {
    pub(crate) fn new() -> Self { Self::default() }

    pub(crate) fn push(&self, status: u16, body: &str) {
        let resp = NetworkResponse { status, data: body.to_string(), ..Default::default() };
        self.replies.lock().unwrap().push_back(Ok(resp));
    }

    pub(crate) fn push_ok(&self, body: &str) { self.push(200, body) }

    pub(crate) fn push_json(&self, body: serde_json::Value) { self.push_ok(&body.to_string()) }

    pub(crate) fn push_err(&self, message: &str) {
        self.replies.lock().unwrap().push_back(Err(message.to_string()));
    }

    pub(crate) fn requests(&self) -> Vec<NetworkRequest> { self.requests.lock().unwrap().clone() }

    /// The `query` field of every request body, in order.
    pub(crate) fn queries(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|r| r.body.as_ref()?.get("query")?.as_str().map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl NetworkClient for FakeClient {
    async fn request(&self, request: NetworkRequest) -> anyhow::Result<NetworkResponse> {
        self.requests.lock().unwrap().push(request);
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(resp)) => Ok(resp),
            Some(Err(msg)) => Err(anyhow!(msg)),
            None => Err(anyhow!("no canned response left")),
        }
    }
}
