//! Retrieval-augmented search
//!
//! Provides:
//! - Request/response types of the Search operation
//! - The retrieval pipeline (embed, similarity search, map hits)
//! - The generation composer (prompt assembly and chat call)

mod generation;
mod pipeline;

pub use generation::{build_prompt, GenerationComposer, GENERATION_FAILURE_PREFIX};
pub use pipeline::SearchPipeline;

use crate::error::{RagwayError, Result};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const NO_CATEGORY: &str = "No Category";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// A user search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    /// Upper bound on returned documents; the configured default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i64>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, max_results: i64) -> Self {
        Self {
            query: query.into(),
            max_results: Some(max_results),
        }
    }

    /// Check the request and resolve the effective result limit
    pub fn validate(&self, default_max_results: usize) -> Result<usize> {
        if self.query.trim().is_empty() {
            return Err(RagwayError::InvalidInput(
                "query must not be blank".to_string(),
            ));
        }
        match self.max_results {
            None => Ok(default_max_results),
            Some(n) if n >= 1 => Ok(n as usize),
            Some(n) => Err(RagwayError::InvalidInput(format!(
                "maxResults must be at least 1, got {}",
                n
            ))),
        }
    }
}

/// One retrieved document as presented to callers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub author: String,
    /// Normalized similarity; 1.0 when the backend reported none
    pub similarity: f64,
}

/// Answer plus the documents it was grounded on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,
    pub ai_answer: String,
    pub similar_documents: Vec<SearchResult>,
    /// Retrieval time only; generation is excluded
    pub search_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_max_results() {
        assert_eq!(SearchRequest::new("q", 3).validate(4).unwrap(), 3);
        assert!(matches!(
            SearchRequest::new("q", 0).validate(4),
            Err(RagwayError::InvalidInput(_))
        ));
        assert!(SearchRequest::new("q", -2).validate(4).is_err());

        let request: SearchRequest = serde_json::from_str(r#"{"query":"q"}"#).unwrap();
        assert_eq!(request.validate(4).unwrap(), 4);
    }

    #[test]
    fn test_validate_blank_query() {
        let err = SearchRequest::new("   ", 3).validate(4).unwrap_err();
        assert!(err.to_string().contains("blank"));
    }

    #[test]
    fn test_response_wire_names() {
        let response = SearchResponse {
            query: "q".to_string(),
            ai_answer: "a".to_string(),
            similar_documents: Vec::new(),
            search_time_ms: 12,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["aiAnswer"], "a");
        assert_eq!(value["searchTimeMs"], 12);
        assert!(value["similarDocuments"].as_array().unwrap().is_empty());

        let request: SearchRequest =
            serde_json::from_str(r#"{"query":"What is ML?","maxResults":3}"#).unwrap();
        assert_eq!(request.max_results, Some(3));
    }
}
