//! Weaviate integration for Weft.
//!
//! [`WeaviateClient`] implements [`SearchService`](weft_core::SearchService)
//! over the [Weaviate](https://weaviate.io/) GraphQL API, including the
//! server-side `rerank` additional field. Reranking itself runs inside
//! Weaviate (via its reranker modules); inference provider keys are forwarded
//! as request headers.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use weft_weaviate::{MetadataField, WeaviateClient, WeaviateConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WeaviateConfig::from_env()?;
//! let client = WeaviateClient::connect(config).await?;
//!
//! let query = client
//!     .collection("JeopardyQuestion")
//!     .near_text(["flying"])
//!     .return_properties(["question", "answer"])
//!     .return_metadata([MetadataField::Distance])
//!     .rerank("answer", "floating")
//!     .limit(10);
//! let response = query.run().await?;
//! response.expect_shape(query.request())?;
//! # Ok(())
//! # }
//! ```

mod backend;
mod client;
mod collection;
mod config;
pub mod graphql;

pub use backend::{Backend, BackendRequest, BackendResponse, FakeBackend, HttpBackend, Method};
pub use client::WeaviateClient;
pub use collection::{Collection, QueryBuilder};
pub use config::{WeaviateConfig, COHERE_KEY_HEADER, OPENAI_KEY_HEADER};

// Re-export core types for convenience.
pub use weft_core::{
    MetadataField, QueryRequest, QueryResponse, Question, Rerank, SearchService, WeftError,
};
