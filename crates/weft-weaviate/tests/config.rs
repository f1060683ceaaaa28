use std::collections::HashMap;

use weft_weaviate::{WeaviateConfig, WeftError, COHERE_KEY_HEADER, OPENAI_KEY_HEADER};

fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

fn header<'a>(config: &'a WeaviateConfig, name: &str) -> Option<&'a str> {
    config
        .headers
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.as_str())
}

#[test]
fn config_new_sets_fields() {
    let config = WeaviateConfig::new("http", "localhost:8080");
    assert_eq!(config.scheme, "http");
    assert_eq!(config.host, "localhost:8080");
    assert!(config.api_key.is_none());
    assert!(config.headers.is_empty());
    assert_eq!(config.base_url(), "http://localhost:8080");
}

#[test]
fn from_url_cloud_cluster() {
    let config =
        WeaviateConfig::from_url("https://my-cluster.c0.europe-west2.gcp.weaviate.cloud/").unwrap();
    assert_eq!(config.scheme, "https");
    assert_eq!(config.host, "my-cluster.c0.europe-west2.gcp.weaviate.cloud");
    assert_eq!(
        config.base_url(),
        "https://my-cluster.c0.europe-west2.gcp.weaviate.cloud"
    );
}

#[test]
fn from_url_without_scheme_defaults_to_https() {
    let config = WeaviateConfig::from_url("my-cluster.weaviate.cloud").unwrap();
    assert_eq!(config.base_url(), "https://my-cluster.weaviate.cloud");
}

#[test]
fn from_url_keeps_port() {
    let config = WeaviateConfig::from_url("http://localhost:8080").unwrap();
    assert_eq!(config.host, "localhost:8080");
}

#[test]
fn from_url_rejects_other_schemes() {
    assert!(matches!(
        WeaviateConfig::from_url("ftp://example.com"),
        Err(WeftError::Config(_))
    ));
}

#[test]
fn from_url_rejects_garbage() {
    assert!(matches!(
        WeaviateConfig::from_url("http://"),
        Err(WeftError::Config(_))
    ));
}

#[test]
fn builder_chain() {
    let config = WeaviateConfig::new("https", "cluster.weaviate.cloud")
        .with_api_key("wcs-key")
        .with_openai_api_key("sk-openai")
        .with_cohere_api_key("co-key")
        .with_header("X-Custom", "1");
    assert_eq!(config.api_key.as_deref(), Some("wcs-key"));
    assert_eq!(header(&config, OPENAI_KEY_HEADER), Some("sk-openai"));
    assert_eq!(header(&config, COHERE_KEY_HEADER), Some("co-key"));
    assert_eq!(header(&config, "X-Custom"), Some("1"));
}

#[test]
fn from_vars_full() {
    let config = WeaviateConfig::from_vars(vars(&[
        ("WEAVIATE_URL", "https://cluster.weaviate.cloud/"),
        ("WEAVIATE_API_KEY", "wcs-key"),
        ("OPENAI_API_KEY", "sk-openai"),
        ("COHERE_API_KEY", "co-key"),
    ]))
    .unwrap();
    assert_eq!(config.base_url(), "https://cluster.weaviate.cloud");
    assert_eq!(config.api_key.as_deref(), Some("wcs-key"));
    assert_eq!(header(&config, OPENAI_KEY_HEADER), Some("sk-openai"));
    assert_eq!(header(&config, COHERE_KEY_HEADER), Some("co-key"));
}

#[test]
fn from_vars_provider_keys_default_to_empty() {
    let config =
        WeaviateConfig::from_vars(vars(&[("WEAVIATE_URL", "http://localhost:8080")])).unwrap();
    assert!(config.api_key.is_none());
    assert_eq!(header(&config, OPENAI_KEY_HEADER), Some(""));
    assert_eq!(header(&config, COHERE_KEY_HEADER), Some(""));
}

#[test]
fn from_vars_requires_url() {
    assert!(matches!(
        WeaviateConfig::from_vars(vars(&[("WEAVIATE_API_KEY", "k")])),
        Err(WeftError::Config(_))
    ));
    assert!(matches!(
        WeaviateConfig::from_vars(vars(&[("WEAVIATE_URL", "  ")])),
        Err(WeftError::Config(_))
    ));
}
