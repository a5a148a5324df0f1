//! Backend-agnostic vector store

use super::{BackendRegistry, DistanceMetric, ScoredPoint, VectorBackend};
use crate::config::VectorStoreConfig;
use crate::document::Document;
use crate::error::{RagwayError, Result};
use crate::llm::Embedder;
use std::sync::Arc;

/// Uniform add/delete/search over whichever driver is configured.
///
/// Scores returned by [`VectorStore::search`] are similarities where higher
/// is better, regardless of the backend's native metric.
#[derive(Clone)]
pub struct VectorStore {
    backend: Arc<dyn VectorBackend>,
    embedder: Arc<dyn Embedder>,
}

impl VectorStore {
    pub fn new(backend: Arc<dyn VectorBackend>, embedder: Arc<dyn Embedder>) -> Self {
        Self { backend, embedder }
    }

    /// Build the configured driver from the built-in registry
    pub fn from_config(config: &VectorStoreConfig, embedder: Arc<dyn Embedder>) -> Result<Self> {
        Self::with_registry(&BackendRegistry::with_defaults(), config, embedder)
    }

    pub fn with_registry(
        registry: &BackendRegistry,
        config: &VectorStoreConfig,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        let backend = registry.create(config, embedder.clone())?;
        Ok(Self::new(backend, embedder))
    }

    /// Name of the active driver
    pub fn provider(&self) -> &str {
        self.backend.name()
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// Readiness probe
    pub async fn ready(&self) -> Result<()> {
        self.backend.ping().await
    }

    /// Idempotent collection/index provisioning
    pub async fn ensure_schema(&self) -> Result<()> {
        self.backend.ensure_schema().await
    }

    /// Embed and store documents; returns the number written
    pub async fn add(&self, documents: &[Document]) -> Result<usize> {
        self.backend.upsert(documents).await
    }

    /// Remove every stored point
    pub async fn delete_all(&self) -> Result<()> {
        self.backend.delete_all().await
    }

    pub async fn count(&self) -> Result<usize> {
        self.backend.count().await
    }

    /// Embed `query` and return at most `top_k` hits with similarity >= `min_score`,
    /// best first. Hits without a reported score are treated as 1.0.
    pub async fn search(&self, query: &str, top_k: usize, min_score: f32) -> Result<Vec<ScoredPoint>> {
        if top_k == 0 {
            return Err(RagwayError::InvalidInput(
                "top_k must be at least 1".to_string(),
            ));
        }

        let vector = self.embedder.embed(query).await?;
        let hits = self
            .backend
            .similarity_search(&vector, top_k, min_score)
            .await?;
        Ok(rank_hits(hits, self.backend.metric(), top_k, min_score))
    }

    /// The underlying driver
    pub fn native(&self) -> &Arc<dyn VectorBackend> {
        &self.backend
    }

    /// The underlying driver as a concrete type, if it is one
    pub fn native_as<T: 'static>(&self) -> Option<&T> {
        self.backend.as_any().downcast_ref::<T>()
    }
}

/// Normalize raw scores, drop hits under `min_score`, order best first and cap at `top_k`
pub fn rank_hits(
    hits: Vec<ScoredPoint>,
    metric: DistanceMetric,
    top_k: usize,
    min_score: f32,
) -> Vec<ScoredPoint> {
    let mut ranked: Vec<ScoredPoint> = hits
        .into_iter()
        .map(|mut hit| {
            hit.score = hit.score.map(|s| metric.to_similarity(s));
            hit
        })
        .filter(|hit| hit.score.unwrap_or(1.0) >= min_score)
        .collect();

    // Stable: equal similarities keep the backend's order
    ranked.sort_by(|a, b| {
        b.score
            .unwrap_or(1.0)
            .partial_cmp(&a.score.unwrap_or(1.0))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(top_k);
    ranked
}
