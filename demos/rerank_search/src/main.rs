//! Near-text and BM25 search on `JeopardyQuestion`, before and after a
//! server-side rerank.
//!
//! ```bash
//! export WEAVIATE_URL="https://your-cluster.weaviate.cloud"
//! export WEAVIATE_API_KEY="..."
//! export OPENAI_API_KEY="..."   # vectorizer
//! export COHERE_API_KEY="..."   # reranker
//! cargo run -p rerank_search
//! ```

use weft::core::{MetadataField, Question, WeftError};
use weft::weaviate::{WeaviateClient, WeaviateConfig};

#[tokio::main]
async fn main() -> Result<(), WeftError> {
    tracing_subscriber::fmt::init();

    let client = WeaviateClient::connect(WeaviateConfig::from_env()?).await?;
    let questions = client.collection("JeopardyQuestion");

    // --- nearText before rerank ---
    println!("=== nearText ===");
    let query = questions
        .near_text(["flying"])
        .return_properties(["question", "answer"])
        .return_metadata([MetadataField::Distance])
        .limit(10);
    let response = query.run().await?;
    println!("{}", response.to_pretty_json());
    response.expect_shape(query.request())?;

    // --- nearText after rerank ---
    println!("\n=== nearText + rerank ===");
    let query = questions
        .near_text(["flying"])
        .return_properties(["question", "answer"])
        .return_metadata([MetadataField::Distance])
        .rerank("answer", "floating")
        .limit(10);
    let response = query.run().await?;
    println!("{}", response.to_pretty_json());
    response.expect_shape(query.request())?;

    // --- bm25 with rerank ---
    println!("\n=== bm25 + rerank ===");
    let query = questions
        .bm25("paper")
        .return_properties(["question", "answer"])
        .return_metadata([MetadataField::Distance])
        .rerank("question", "publication")
        .limit(10);
    let response = query.run().await?;
    println!("{}", response.to_pretty_json());
    response.expect_shape(query.request())?;

    println!("\nTop {} after rerank:", response.len());
    for (i, q) in response.records::<Question>()?.iter().enumerate() {
        let score = q.additional.rerank_score().unwrap_or_default();
        println!("  {i}: [{score:.3}] {}", q.question);
    }

    Ok(())
}
