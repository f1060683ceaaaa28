use weft_core::{MetadataField, QueryRequest, QueryResponse, Rerank, SearchService, WeftError};

use crate::client::WeaviateClient;

/// A named collection on a [`WeaviateClient`].
#[derive(Clone)]
pub struct Collection {
    client: WeaviateClient,
    name: String,
}

impl Collection {
    pub(crate) fn new(client: WeaviateClient, name: impl Into<String>) -> Self {
        Self {
            client,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start a semantic query.
    pub fn near_text<I, S>(&self, concepts: I) -> QueryBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryBuilder {
            client: self.client.clone(),
            request: QueryRequest::near_text(self.name.clone(), concepts),
        }
    }

    /// Start a keyword query.
    pub fn bm25(&self, query: impl Into<String>) -> QueryBuilder {
        QueryBuilder {
            client: self.client.clone(),
            request: QueryRequest::bm25(self.name.clone(), query),
        }
    }
}

/// Fluent builder over a [`QueryRequest`], bound to a client.
pub struct QueryBuilder {
    client: WeaviateClient,
    request: QueryRequest,
}

impl QueryBuilder {
    pub fn return_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request = self.request.with_properties(properties);
        self
    }

    pub fn return_metadata(mut self, metadata: impl IntoIterator<Item = MetadataField>) -> Self {
        self.request = self.request.with_metadata(metadata);
        self
    }

    pub fn rerank(mut self, property: impl Into<String>, query: impl Into<String>) -> Self {
        self.request = self.request.with_rerank(Rerank::new(property, query));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.request = self.request.with_limit(limit);
        self
    }

    pub fn bm25_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request = self.request.with_bm25_properties(properties);
        self
    }

    pub fn request(&self) -> &QueryRequest {
        &self.request
    }

    pub fn into_request(self) -> QueryRequest {
        self.request
    }

    pub async fn run(&self) -> Result<QueryResponse, WeftError> {
        self.client.query(&self.request).await
    }
}
