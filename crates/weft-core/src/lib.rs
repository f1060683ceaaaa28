//! Core types for Weft: query descriptors, result records, the [`SearchService`]
//! seam, and [`WeftError`].
//!
//! Provider crates (see `weft-weaviate`) implement [`SearchService`]; callers
//! build a [`QueryRequest`], submit it, and optionally check the response with
//! [`QueryResponse::expect_shape`].

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub mod shape;

pub use shape::{ShapeError, ShapeExpectation};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A `JeopardyQuestion` object as returned by a `Get` query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub answer: String,
    #[serde(rename = "_additional", default)]
    pub additional: Additional,
}

/// Server-computed metadata attached to every object under `_additional`.
///
/// Every field is optional: the service only fills in what was requested, and
/// keyword queries report `distance` as `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Additional {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certainty: Option<f64>,
    /// BM25 score. The service encodes it as a string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rerank: Option<Vec<RerankScore>>,
}

impl Additional {
    /// Score of the first rerank entry, if a rerank was requested.
    pub fn rerank_score(&self) -> Option<f64> {
        self.rerank.as_ref()?.first().map(|r| r.score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RerankScore {
    pub score: f64,
}

// ---------------------------------------------------------------------------
// Query descriptor
// ---------------------------------------------------------------------------

/// How the initial candidate set is retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum QueryMode {
    /// Semantic search over the collection's vector index.
    NearText { concepts: Vec<String> },
    /// Keyword search. An empty `properties` list searches every text property.
    Bm25 {
        query: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        properties: Vec<String>,
    },
}

impl QueryMode {
    pub fn name(&self) -> &'static str {
        match self {
            QueryMode::NearText { .. } => "nearText",
            QueryMode::Bm25 { .. } => "bm25",
        }
    }
}

/// Server-side rerank directive: rescore results on `property` against `query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rerank {
    pub property: String,
    pub query: String,
}

impl Rerank {
    pub fn new(property: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            query: query.into(),
        }
    }
}

/// Metadata that can be requested under `_additional`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataField {
    Id,
    Distance,
    Certainty,
    Score,
}

impl MetadataField {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataField::Id => "id",
            MetadataField::Distance => "distance",
            MetadataField::Certainty => "certainty",
            MetadataField::Score => "score",
        }
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider-neutral description of one `Get` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub collection: String,
    pub mode: QueryMode,
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub metadata: Vec<MetadataField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rerank: Option<Rerank>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl QueryRequest {
    fn with_mode(collection: impl Into<String>, mode: QueryMode) -> Self {
        Self {
            collection: collection.into(),
            mode,
            properties: Vec::new(),
            metadata: Vec::new(),
            rerank: None,
            limit: None,
        }
    }

    /// Semantic query over one or more concepts.
    pub fn near_text<I, S>(collection: impl Into<String>, concepts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let concepts = concepts.into_iter().map(Into::into).collect();
        Self::with_mode(collection, QueryMode::NearText { concepts })
    }

    /// Keyword (BM25) query.
    pub fn bm25(collection: impl Into<String>, query: impl Into<String>) -> Self {
        Self::with_mode(
            collection,
            QueryMode::Bm25 {
                query: query.into(),
                properties: Vec::new(),
            },
        )
    }

    pub fn with_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties = properties.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_metadata(mut self, metadata: impl IntoIterator<Item = MetadataField>) -> Self {
        self.metadata = metadata.into_iter().collect();
        self
    }

    pub fn with_rerank(mut self, rerank: Rerank) -> Self {
        self.rerank = Some(rerank);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Restrict a BM25 query to the given properties. No effect on near-text queries.
    pub fn with_bm25_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let QueryMode::Bm25 {
            properties: ref mut searched,
            ..
        } = self.mode
        {
            *searched = properties.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Whether the query selects anything under `_additional`.
    pub fn wants_additional(&self) -> bool {
        !self.metadata.is_empty() || self.rerank.is_some()
    }

    /// Reject descriptors the service could never accept.
    pub fn validate(&self) -> Result<(), WeftError> {
        if !is_graphql_name(&self.collection) {
            return Err(WeftError::Validation(format!(
                "invalid collection name: {:?}",
                self.collection
            )));
        }
        for property in &self.properties {
            check_property(property)?;
        }
        match &self.mode {
            QueryMode::NearText { concepts } => {
                if concepts.is_empty() {
                    return Err(WeftError::Validation(
                        "nearText requires at least one concept".to_string(),
                    ));
                }
            }
            QueryMode::Bm25 { query, properties } => {
                if query.trim().is_empty() {
                    return Err(WeftError::Validation(
                        "bm25 query must not be blank".to_string(),
                    ));
                }
                for property in properties {
                    check_property(property)?;
                }
            }
        }
        if let Some(rerank) = &self.rerank {
            check_property(&rerank.property)?;
        }
        if self.limit == Some(0) {
            return Err(WeftError::Validation("limit must be positive".to_string()));
        }
        if self.properties.is_empty() && !self.wants_additional() {
            return Err(WeftError::Validation(
                "query selects no fields".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_property(name: &str) -> Result<(), WeftError> {
    if is_graphql_name(name) {
        Ok(())
    } else {
        Err(WeftError::Validation(format!(
            "invalid property name: {name:?}"
        )))
    }
}

/// `true` if `name` matches the GraphQL name grammar `[_A-Za-z][_0-9A-Za-z]*`.
pub fn is_graphql_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Objects returned for one query, plus the untouched response body.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse {
    pub collection: String,
    pub objects: Vec<Map<String, Value>>,
    pub raw: Value,
}

impl QueryResponse {
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Decode every object into `T`, e.g. [`Question`].
    pub fn records<T: DeserializeOwned>(&self) -> Result<Vec<T>, WeftError> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, object)| {
                serde_json::from_value(Value::Object(object.clone())).map_err(|e| {
                    WeftError::Parsing(format!("{} object {i}: {e}", self.collection))
                })
            })
            .collect()
    }

    /// Pretty-printed raw body, for console inspection.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.raw).unwrap_or_else(|_| self.raw.to_string())
    }

    /// Check the response against the shape implied by `request`.
    pub fn expect_shape(&self, request: &QueryRequest) -> Result<(), WeftError> {
        ShapeExpectation::for_request(request).check(self)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum WeftError {
    #[error("config error: {0}")]
    Config(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("connection error: {0}")]
    Connection(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("query error: {0}")]
    Query(String),
    #[error("parsing error: {0}")]
    Parsing(String),
    #[error("shape error: {0}")]
    Shape(#[from] ShapeError),
}

// ---------------------------------------------------------------------------
// Core traits
// ---------------------------------------------------------------------------

/// A remote search service that executes [`QueryRequest`]s.
#[async_trait]
pub trait SearchService: Send + Sync {
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, WeftError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_names() {
        assert!(is_graphql_name("JeopardyQuestion"));
        assert!(is_graphql_name("_additional"));
        assert!(is_graphql_name("answer2"));
        assert!(!is_graphql_name(""));
        assert!(!is_graphql_name("2answer"));
        assert!(!is_graphql_name("answer { id }"));
        assert!(!is_graphql_name("naïve"));
    }

    #[test]
    fn bm25_properties_ignored_for_near_text() {
        let req = QueryRequest::near_text("Q", ["a"]).with_bm25_properties(["question"]);
        assert_eq!(
            req.mode,
            QueryMode::NearText {
                concepts: vec!["a".to_string()]
            }
        );
    }

    #[test]
    fn rerank_score_reads_first_entry() {
        let additional = Additional {
            rerank: Some(vec![RerankScore { score: 0.25 }, RerankScore { score: 0.1 }]),
            ..Default::default()
        };
        assert_eq!(additional.rerank_score(), Some(0.25));
        assert_eq!(Additional::default().rerank_score(), None);
    }
}
