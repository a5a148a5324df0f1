//! Retrieval: embed the query, search the store, map hits

use super::{SearchResult, NO_CATEGORY, UNKNOWN_AUTHOR, UNKNOWN_TITLE};
use crate::config::SearchConfig;
use crate::document::keys;
use crate::error::{RagwayError, Result};
use crate::store::{ScoredPoint, VectorStore};

/// Similarity retrieval over the configured store
#[derive(Clone)]
pub struct SearchPipeline {
    store: VectorStore,
    config: SearchConfig,
}

impl SearchPipeline {
    pub fn new(store: VectorStore, config: SearchConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Up to `max_results` documents at or above the similarity threshold, best first.
    ///
    /// Every failure, including the retrieval timeout, is a `Retrieval` error.
    pub async fn retrieve(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        let timeout = self.config.retrieval_timeout();
        let hits = tokio::time::timeout(
            timeout,
            self.store
                .search(query, max_results, self.config.similarity_threshold),
        )
        .await
        .map_err(|_| {
            RagwayError::Retrieval(format!("similarity search timed out after {:?}", timeout))
        })?
        .map_err(|e| RagwayError::Retrieval(e.to_string()))?;

        tracing::info!("Found {} similar documents", hits.len());
        hits.into_iter().map(to_search_result).collect()
    }
}

fn to_search_result(hit: ScoredPoint) -> Result<SearchResult> {
    let ScoredPoint {
        id,
        mut payload,
        score,
    } = hit;

    let content = payload.remove(keys::CONTENT).ok_or_else(|| {
        RagwayError::Retrieval(format!("malformed payload for {}: missing content", id))
    })?;
    let mut field = |key: &str, fallback: &str| {
        payload
            .remove(key)
            .unwrap_or_else(|| fallback.to_string())
    };

    Ok(SearchResult {
        title: field(keys::TITLE, UNKNOWN_TITLE),
        category: field(keys::CATEGORY, NO_CATEGORY),
        author: field(keys::AUTHOR, UNKNOWN_AUTHOR),
        content,
        similarity: score.map(f64::from).unwrap_or(1.0),
        id,
    })
}
