//! Rendering of [`QueryRequest`]s into Weaviate GraphQL `Get` queries.

use serde_json::Value;
use weft_core::{QueryMode, QueryRequest, WeftError};

/// Render `request` as a `{ Get { ... } }` query string.
///
/// ```text
/// { Get { JeopardyQuestion(limit: 10, nearText: { concepts: ["flying"] }) {
///     question answer _additional { distance rerank(property: "answer" query: "floating") { score } } } } }
/// ```
pub fn render_get(request: &QueryRequest) -> Result<String, WeftError> {
    request.validate()?;

    let mut args = Vec::with_capacity(2);
    if let Some(limit) = request.limit {
        args.push(format!("limit: {limit}"));
    }
    args.push(render_mode(&request.mode));

    let mut fields: Vec<String> = request.properties.clone();
    if request.wants_additional() {
        fields.push(render_additional(request));
    }

    Ok(format!(
        "{{ Get {{ {class}({args}) {{ {fields} }} }} }}",
        class = request.collection,
        args = args.join(", "),
        fields = fields.join(" "),
    ))
}

fn render_mode(mode: &QueryMode) -> String {
    match mode {
        QueryMode::NearText { concepts } => {
            format!("nearText: {{ concepts: {} }}", string_list(concepts))
        }
        QueryMode::Bm25 { query, properties } if properties.is_empty() => {
            format!("bm25: {{ query: {} }}", string_literal(query))
        }
        QueryMode::Bm25 { query, properties } => format!(
            "bm25: {{ query: {}, properties: {} }}",
            string_literal(query),
            string_list(properties)
        ),
    }
}

fn render_additional(request: &QueryRequest) -> String {
    let mut parts: Vec<String> = request
        .metadata
        .iter()
        .map(|m| m.as_str().to_string())
        .collect();
    if let Some(rerank) = &request.rerank {
        parts.push(format!(
            "rerank(property: {} query: {}) {{ score }}",
            string_literal(&rerank.property),
            string_literal(&rerank.query)
        ));
    }
    format!("_additional {{ {} }}", parts.join(" "))
}

/// JSON string escaping yields a valid GraphQL string literal.
fn string_literal(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

fn string_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| string_literal(s)).collect();
    format!("[{}]", quoted.join(", "))
}
