use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use weft_core::{QueryRequest, QueryResponse, SearchService, WeftError};

use crate::backend::{Backend, BackendRequest, BackendResponse, HttpBackend};
use crate::collection::Collection;
use crate::config::WeaviateConfig;
use crate::graphql;

/// Weaviate client.
///
/// Talks to the v1 REST API:
/// - GraphQL queries: `POST /v1/graphql`
/// - Readiness: `GET /v1/.well-known/ready`
/// - Server metadata: `GET /v1/meta`
///
/// Cloning is cheap; clones share the backend.
#[derive(Clone)]
pub struct WeaviateClient {
    config: Arc<WeaviateConfig>,
    backend: Arc<dyn Backend>,
}

impl WeaviateClient {
    /// Create a client over HTTP. Performs no I/O.
    pub fn new(config: WeaviateConfig) -> Self {
        Self::with_backend(config, Arc::new(HttpBackend::new()))
    }

    pub fn with_backend(config: WeaviateConfig, backend: Arc<dyn Backend>) -> Self {
        Self {
            config: Arc::new(config),
            backend,
        }
    }

    /// Create a client and check that the cluster is ready to serve.
    pub async fn connect(config: WeaviateConfig) -> Result<Self, WeftError> {
        Self::connect_with_backend(config, Arc::new(HttpBackend::new())).await
    }

    pub async fn connect_with_backend(
        config: WeaviateConfig,
        backend: Arc<dyn Backend>,
    ) -> Result<Self, WeftError> {
        let client = Self::with_backend(config, backend);
        let response = client.probe_ready().await?;
        if !response.is_success() {
            return Err(WeftError::Connection(format!(
                "{} is not ready (HTTP {})",
                client.config.base_url(),
                response.status
            )));
        }
        tracing::info!(url = %client.config.base_url(), "connected to Weaviate");
        Ok(client)
    }

    /// Return a reference to the configuration.
    pub fn config(&self) -> &WeaviateConfig {
        &self.config
    }

    /// Handle for querying one collection.
    pub fn collection(&self, name: impl Into<String>) -> Collection {
        Collection::new(self.clone(), name)
    }

    /// `true` if the readiness endpoint answers with a 2xx status.
    pub async fn is_ready(&self) -> Result<bool, WeftError> {
        Ok(self.probe_ready().await?.is_success())
    }

    /// Server metadata: version, enabled modules.
    pub async fn meta(&self) -> Result<Value, WeftError> {
        let url = format!("{}/v1/meta", self.config.base_url());
        let response = self
            .backend
            .send(BackendRequest::get(url, self.headers()))
            .await?;
        if !response.is_success() {
            return Err(http_error("meta", response));
        }
        Ok(response.body)
    }

    async fn probe_ready(&self) -> Result<BackendResponse, WeftError> {
        let url = format!("{}/v1/.well-known/ready", self.config.base_url());
        self.backend
            .send(BackendRequest::get(url, self.headers()))
            .await
    }

    fn headers(&self) -> Vec<(String, String)> {
        let mut headers = Vec::with_capacity(self.config.headers.len() + 1);
        if let Some(ref key) = self.config.api_key {
            headers.push(("Authorization".to_string(), format!("Bearer {key}")));
        }
        headers.extend(self.config.headers.iter().cloned());
        headers
    }
}

#[async_trait]
impl SearchService for WeaviateClient {
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, WeftError> {
        let query = graphql::render_get(request)?;
        tracing::debug!(
            collection = %request.collection,
            mode = request.mode.name(),
            limit = ?request.limit,
            rerank = request.rerank.is_some(),
            "Weaviate query"
        );

        let url = format!("{}/v1/graphql", self.config.base_url());
        let response = self
            .backend
            .send(BackendRequest::post(
                url,
                self.headers(),
                json!({ "query": query }),
            ))
            .await?;

        if !response.is_success() {
            return Err(http_error("query", response));
        }

        let raw = response.body;
        if let Some(message) = graphql_errors(&raw) {
            tracing::warn!(collection = %request.collection, error = %message, "Weaviate query rejected");
            return Err(WeftError::Query(message));
        }

        let objects = extract_objects(&raw, &request.collection)?;
        tracing::debug!(collection = %request.collection, count = objects.len(), "Weaviate query done");

        Ok(QueryResponse {
            collection: request.collection.clone(),
            objects,
            raw,
        })
    }
}

fn http_error(op: &str, response: BackendResponse) -> WeftError {
    tracing::warn!(op, status = response.status, "Weaviate request failed");
    WeftError::Http {
        status: response.status,
        body: response.body_text(),
    }
}

/// Messages of a non-empty top-level `errors` array, joined with `; `.
fn graphql_errors(body: &Value) -> Option<String> {
    let errors = body.get("errors")?.as_array()?;
    if errors.is_empty() {
        return None;
    }
    let messages: Vec<String> = errors
        .iter()
        .map(|e| match e.get("message").and_then(Value::as_str) {
            Some(m) => m.to_string(),
            None => e.to_string(),
        })
        .collect();
    Some(messages.join("; "))
}

fn extract_objects(body: &Value, collection: &str) -> Result<Vec<Map<String, Value>>, WeftError> {
    let items = body
        .get("data")
        .and_then(|d| d.get("Get"))
        .and_then(|g| g.get(collection))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            WeftError::Parsing(format!("response has no data.Get.{collection} array"))
        })?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_object()
                .cloned()
                .ok_or_else(|| WeftError::Parsing(format!("{collection} object {i} is not a JSON object")))
        })
        .collect()
}
