// Integration tests against a live cluster hosting the JeopardyQuestion
// collection with a text vectorizer and a reranker module enabled.
// Run with: WEAVIATE_URL=... WEAVIATE_API_KEY=... cargo test -p weft-weaviate -- --ignored

use weft_weaviate::{MetadataField, Question, WeaviateClient, WeaviateConfig};

async fn client() -> WeaviateClient {
    let config = WeaviateConfig::from_env().expect("WEAVIATE_URL must be set");
    WeaviateClient::connect(config)
        .await
        .expect("cluster not ready")
}

#[tokio::test]
#[ignore = "requires a Weaviate cluster with JeopardyQuestion"]
async fn near_text_flying() {
    let client = client().await;
    let query = client
        .collection("JeopardyQuestion")
        .near_text(["flying"])
        .return_properties(["question", "answer"])
        .return_metadata([MetadataField::Distance])
        .limit(10);
    let response = query.run().await.unwrap();
    response.expect_shape(query.request()).unwrap();

    let questions: Vec<Question> = response.records().unwrap();
    assert!(questions.iter().all(|q| q.additional.distance.is_some()));
}

#[tokio::test]
#[ignore = "requires a Weaviate cluster with JeopardyQuestion and a reranker module"]
async fn near_text_flying_reranked() {
    let client = client().await;
    let query = client
        .collection("JeopardyQuestion")
        .near_text(["flying"])
        .return_properties(["question", "answer"])
        .return_metadata([MetadataField::Distance])
        .rerank("answer", "floating")
        .limit(10);
    let response = query.run().await.unwrap();
    response.expect_shape(query.request()).unwrap();
}

#[tokio::test]
#[ignore = "requires a Weaviate cluster with JeopardyQuestion and a reranker module"]
async fn bm25_paper_reranked() {
    let client = client().await;
    let query = client
        .collection("JeopardyQuestion")
        .bm25("paper")
        .return_properties(["question", "answer"])
        .return_metadata([MetadataField::Distance])
        .rerank("question", "publication")
        .limit(10);
    let response = query.run().await.unwrap();
    response.expect_shape(query.request()).unwrap();
}
