// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::SinkError;

/// Adapter for outbound HTTP calls driven by `webhook` and `http_request`
/// action specs. Returns the response body parsed as JSON when the
/// response is `2xx`; any other status is a `SinkError`.
#[async_trait]
pub trait HttpSink: Send + Sync + 'static {
    async fn call(&self, method: &str, url: &str, body: &Map<String, Value>) -> Result<Value, SinkError>;
}

/// Reference HTTP sink backed by `reqwest`.
pub struct ReqwestHttpSink {
    client: reqwest::Client,
}

impl ReqwestHttpSink {
    pub fn new() -> Self {
        Self { client: reqwest::Client::new() }
    }
}

impl Default for ReqwestHttpSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpSink for ReqwestHttpSink {
    async fn call(&self, method: &str, url: &str, body: &Map<String, Value>) -> Result<Value, SinkError> {
        let method = reqwest::Method::from_bytes(method.as_bytes()).map_err(|e| SinkError::Request(e.to_string()))?;
        let response = self
            .client
            .request(method, url)
            .json(body)
            .send()
            .await
            .map_err(|e| SinkError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Request(format!("status {status}")));
        }
        response.json::<Value>().await.map_err(|e| SinkError::Request(e.to_string()))
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{HttpSink, Map, SinkError, Value};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Debug, Clone)]
    pub struct HttpCall {
        pub method: String,
        pub url: String,
        pub body: Map<String, Value>,
    }

    #[derive(Clone, Default)]
    pub struct FakeHttpSink {
        calls: Arc<Mutex<Vec<HttpCall>>>,
        response: Arc<Mutex<Option<Value>>>,
    }

    impl FakeHttpSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_response(&self, value: Value) {
            *self.response.lock() = Some(value);
        }

        pub fn calls(&self) -> Vec<HttpCall> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl HttpSink for FakeHttpSink {
        async fn call(&self, method: &str, url: &str, body: &Map<String, Value>) -> Result<Value, SinkError> {
            self.calls.lock().push(HttpCall { method: method.to_string(), url: url.to_string(), body: body.clone() });
            Ok(self.response.lock().clone().unwrap_or(Value::Null))
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeHttpSink, HttpCall};

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
