use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use weft_core::WeftError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackendRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl BackendRequest {
    pub fn get(url: impl Into<String>, headers: Vec<(String, String)>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers,
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, headers: Vec<(String, String)>, body: Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers,
            body: Some(body),
        }
    }

    /// Value of the first header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackendResponse {
    pub status: u16,
    pub body: Value,
}

impl BackendResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body as text, for error messages.
    pub fn body_text(&self) -> String {
        match &self.body {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Transport seam between [`WeaviateClient`](crate::WeaviateClient) and the network.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn send(&self, request: BackendRequest) -> Result<BackendResponse, WeftError>;
}

/// Production backend using reqwest.
pub struct HttpBackend {
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn send(&self, request: BackendRequest) -> Result<BackendResponse, WeftError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| WeftError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| WeftError::Transport(format!("failed to read response body: {e}")))?;

        Ok(BackendResponse {
            status,
            body: decode_body(text),
        })
    }
}

/// Readiness probes answer with an empty body; error pages may not be JSON.
fn decode_body(text: String) -> Value {
    if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    }
}

/// Test backend with queued responses. Records every request it receives.
pub struct FakeBackend {
    responses: Arc<Mutex<VecDeque<Result<BackendResponse, WeftError>>>>,
    requests: Arc<Mutex<Vec<BackendRequest>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn push_response(&self, response: BackendResponse) -> &Self {
        self.responses
            .try_lock()
            .expect("not concurrent during setup")
            .push_back(Ok(response));
        self
    }

    pub fn push_json(&self, status: u16, body: Value) -> &Self {
        self.push_response(BackendResponse::new(status, body))
    }

    pub fn push_error(&self, error: WeftError) -> &Self {
        self.responses
            .try_lock()
            .expect("not concurrent during setup")
            .push_back(Err(error));
        self
    }

    /// Requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<BackendRequest> {
        self.requests.lock().await.clone()
    }
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn send(&self, request: BackendRequest) -> Result<BackendResponse, WeftError> {
        self.requests.lock().await.push(request);
        let mut responses = self.responses.lock().await;
        responses
            .pop_front()
            .unwrap_or_else(|| Err(WeftError::Transport("FakeBackend exhausted".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn body_text_variants() {
        assert_eq!(BackendResponse::new(500, Value::Null).body_text(), "");
        assert_eq!(
            BackendResponse::new(502, json!("Bad Gateway")).body_text(),
            "Bad Gateway"
        );
        assert_eq!(
            BackendResponse::new(401, json!({"error": "x"})).body_text(),
            r#"{"error":"x"}"#
        );
    }

    #[test]
    fn decode_body_empty_is_null() {
        assert_eq!(decode_body(String::new()), Value::Null);
        assert_eq!(decode_body("  \n".to_string()), Value::Null);
    }

    #[test]
    fn decode_body_keeps_non_json_text() {
        assert_eq!(
            decode_body("Bad Gateway".to_string()),
            Value::String("Bad Gateway".to_string())
        );
    }

    #[test]
    fn decode_body_parses_json() {
        assert_eq!(
            decode_body(r#"{"version":"1.24.1"}"#.to_string()),
            json!({ "version": "1.24.1" })
        );
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = BackendRequest::get(
            "http://localhost/v1/meta",
            vec![("Authorization".to_string(), "Bearer k".to_string())],
        );
        assert_eq!(req.header("authorization"), Some("Bearer k"));
        assert_eq!(req.header("x-missing"), None);
    }

    #[tokio::test]
    async fn fake_backend_replays_in_order_then_exhausts() {
        let backend = FakeBackend::new();
        backend.push_json(200, json!({"a": 1})).push_json(404, Value::Null);

        let first = backend
            .send(BackendRequest::get("u1", Vec::new()))
            .await
            .unwrap();
        assert_eq!(first.body["a"], 1);
        let second = backend
            .send(BackendRequest::get("u2", Vec::new()))
            .await
            .unwrap();
        assert_eq!(second.status, 404);
        let third = backend.send(BackendRequest::get("u3", Vec::new())).await;
        assert!(matches!(third, Err(WeftError::Transport(_))));

        let urls: Vec<String> = backend.requests().await.into_iter().map(|r| r.url).collect();
        assert_eq!(urls, vec!["u1", "u2", "u3"]);
    }
}
