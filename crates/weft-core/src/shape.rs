//! Structural checks on query responses.
//!
//! These verify which keys are present, never what the values are: score
//! ordering, distance ranges and relevance are not inspected.

use std::collections::BTreeSet;

use serde_json::Value;
use thiserror::Error;

use crate::{QueryRequest, QueryResponse};

const ADDITIONAL: &str = "_additional";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("expected {expected} objects, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("object {index}: expected keys {expected:?}, got {actual:?}")]
    KeyMismatch {
        index: usize,
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[error("object {index}: _additional has no `{key}`")]
    MissingMetadata { index: usize, key: String },
    #[error("object {index}: _additional.rerank[0] has no `score`")]
    MissingRerankScore { index: usize },
}

/// The shape every object of a response must have.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShapeExpectation {
    /// Exact top-level key set of each object.
    pub keys: BTreeSet<String>,
    /// Exact number of objects, if known.
    pub len: Option<usize>,
    /// Keys that must be present under `_additional`.
    pub metadata: Vec<String>,
    /// Whether `_additional.rerank[0].score` must be present.
    pub rerank_score: bool,
}

impl ShapeExpectation {
    /// Derive the expected shape from what `request` asked for.
    pub fn for_request(request: &QueryRequest) -> Self {
        let mut keys: BTreeSet<String> = request.properties.iter().cloned().collect();
        if request.wants_additional() {
            keys.insert(ADDITIONAL.to_string());
        }
        Self {
            keys,
            len: request.limit,
            metadata: request
                .metadata
                .iter()
                .map(|m| m.as_str().to_string())
                .collect(),
            rerank_score: request.rerank.is_some(),
        }
    }

    pub fn check(&self, response: &QueryResponse) -> Result<(), ShapeError> {
        if let Some(expected) = self.len {
            if response.objects.len() != expected {
                return Err(ShapeError::LengthMismatch {
                    expected,
                    actual: response.objects.len(),
                });
            }
        }

        let expected: BTreeSet<&str> = self.keys.iter().map(String::as_str).collect();
        for (index, object) in response.objects.iter().enumerate() {
            let actual: BTreeSet<&str> = object.keys().map(String::as_str).collect();
            if actual != expected {
                return Err(ShapeError::KeyMismatch {
                    index,
                    expected: self.keys.iter().cloned().collect(),
                    actual: actual.into_iter().map(str::to_string).collect(),
                });
            }

            let additional = object.get(ADDITIONAL);
            for key in &self.metadata {
                let present = additional
                    .and_then(Value::as_object)
                    .is_some_and(|a| a.contains_key(key));
                if !present {
                    return Err(ShapeError::MissingMetadata {
                        index,
                        key: key.clone(),
                    });
                }
            }

            if self.rerank_score {
                let has_score = additional
                    .and_then(|a| a.get("rerank"))
                    .and_then(Value::as_array)
                    .and_then(|r| r.first())
                    .and_then(Value::as_object)
                    .is_some_and(|first| first.contains_key("score"));
                if !has_score {
                    return Err(ShapeError::MissingRerankScore { index });
                }
            }
        }

        Ok(())
    }
}
