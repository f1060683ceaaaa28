//! Weft: query a hosted vector-search service and rerank the results server-side.
//!
//! This crate re-exports the Weft sub-crates for single-import usage.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `default` | `weaviate` |
//! | `weaviate` | Weaviate GraphQL client, config, and test backend |
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use weft::core::{MetadataField, SearchService};
//! use weft::weaviate::{WeaviateClient, WeaviateConfig};
//! ```

/// Core types: QueryRequest, Question, SearchService, WeftError, shape checks.
/// Always available.
pub use weft_core as core;

/// Weaviate client implementing SearchService.
#[cfg(feature = "weaviate")]
pub use weft_weaviate as weaviate;
