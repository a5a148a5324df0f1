//! MCP tool definitions and handlers

use crate::protocol::*;
use anyhow::Result;
use ragway_core::{Gateway, SearchRequest};
use serde_json::Value;

pub fn search_tool_definition(default_max_results: usize) -> ToolDefinition {
    ToolDefinition {
        name: "search".to_string(),
        description: "Semantic search over the document corpus with an AI-generated answer grounded in the matching documents".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Natural language question"
                },
                "maxResults": {
                    "type": "integer",
                    "description": format!("Maximum documents to retrieve (default: {})", default_max_results),
                    "minimum": 1,
                    "default": default_max_results
                }
            },
            "required": ["query"]
        }),
    }
}

pub fn health_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "health".to_string(),
        description: "Liveness check".to_string(),
        input_schema: serde_json::json!({ "type": "object", "properties": {} }),
    }
}

pub fn reseed_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "reseed".to_string(),
        description: "Delete every stored document and reload the demo corpus".to_string(),
        input_schema: serde_json::json!({ "type": "object", "properties": {} }),
    }
}

pub async fn handle_search(gateway: &Gateway, args: Value) -> Result<ToolResult> {
    let request = parse_search_args(args)?;
    let response = gateway.search(&request).await?;

    let mut summary = format!(
        "{}\n\nFound {} document(s) for \"{}\" in {}ms",
        response.ai_answer,
        response.similar_documents.len(),
        response.query,
        response.search_time_ms
    );
    for doc in &response.similar_documents {
        summary.push_str(&format!(
            "\n  - {} ({}) by {} [{:.2}]",
            doc.title, doc.id, doc.author, doc.similarity
        ));
    }

    Ok(ToolResult::text(summary).with_structured(serde_json::to_value(&response)?))
}

pub async fn handle_health(gateway: &Gateway) -> Result<ToolResult> {
    Ok(ToolResult::text(gateway.health()))
}

pub async fn handle_reseed(gateway: &Gateway) -> Result<ToolResult> {
    match gateway.reseed_report().await {
        Ok(report) => Ok(ToolResult::text(ragway_core::RESEED_SUCCESS)
            .with_structured(serde_json::to_value(report)?)),
        Err(e) => {
            tracing::error!("Error initializing data: {}", e);
            Ok(ToolResult::error(format!(
                "{}{}",
                ragway_core::RESEED_FAILURE_PREFIX,
                e
            )))
        }
    }
}

fn parse_search_args(args: Value) -> Result<SearchRequest> {
    let query = args
        .get("query")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Missing query"))?;

    let max_results = match args.get("maxResults") {
        None | Some(Value::Null) => None,
        Some(v) => Some(
            v.as_i64()
                .ok_or_else(|| anyhow::anyhow!("maxResults must be an integer"))?,
        ),
    };

    Ok(SearchRequest {
        query: query.to_string(),
        max_results,
    })
}
