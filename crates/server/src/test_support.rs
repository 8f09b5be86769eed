//! Router harness shared by the handler tests.

#![allow(clippy::unwrap_used)]

use std::path::Path;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::db::memory::MemoryStore;
use crate::state::AppState;

pub struct TestApp {
    state: AppState<MemoryStore>,
    router: Router,
}

impl TestApp {
    pub fn new(store: MemoryStore) -> Self {
        let state = AppState::new(store, "Customer Desk");
        // Tests run from the crate root
        let router = crate::router(state.clone(), Path::new("static"));
        Self { state, router }
    }

    pub fn store(&self) -> &MemoryStore {
        self.state.store()
    }

    /// Send a request without a body and return the raw response.
    pub async fn raw(&self, method: Method, uri: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Send an optional JSON body; non-JSON answers come back as a string.
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        match body {
            Some(json) => {
                self.send_body(method, uri, "application/json", &json.to_string())
                    .await
            }
            None => {
                let response = self.raw(method, uri).await;
                Self::decode(response).await
            }
        }
    }

    /// Send `body` verbatim under the given content type.
    pub async fn send_body(
        &self,
        method: Method,
        uri: &str,
        content_type: &str,
        body: &str,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body.to_owned()))
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        Self::decode(response).await
    }

    async fn decode(response: Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        (status, value)
    }
}
