//! Vector storage
//!
//! Provides:
//! - The `VectorBackend` driver contract and its Qdrant, Milvus and in-memory drivers
//! - A registry that maps a configured provider name to a driver
//! - The backend-agnostic `VectorStore` facade used by the rest of the system

mod facade;
mod memory;
mod milvus;
mod qdrant;
mod registry;

pub use facade::{rank_hits, VectorStore};
pub use memory::{cosine_similarity, MemoryBackend};
pub use milvus::MilvusBackend;
pub use qdrant::{point_uuid, QdrantBackend};
pub use registry::{BackendFactory, BackendRegistry};

use crate::document::{Document, Payload};
use crate::error::{RagwayError, Result};
use crate::llm::Embedder;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Contract every vector engine driver implements
#[async_trait]
pub trait VectorBackend: Send + Sync {
    /// Registered provider name
    fn name(&self) -> &str;

    /// Metric the collection is ranked by
    fn metric(&self) -> DistanceMetric;

    /// Cheap readiness probe
    async fn ping(&self) -> Result<()>;

    /// Create collection (and index) only if absent
    async fn ensure_schema(&self) -> Result<()>;

    /// Embed documents and write them in one batch; returns points written
    async fn upsert(&self, documents: &[Document]) -> Result<usize>;

    /// Remove every point; returns once the backend acknowledged completion
    async fn delete_all(&self) -> Result<()>;

    /// Up to `top_k` hits in backend ranking order with raw scores.
    /// Drivers may apply `min_score` natively for similarity metrics.
    async fn similarity_search(
        &self,
        vector: &[f32],
        top_k: usize,
        min_score: f32,
    ) -> Result<Vec<ScoredPoint>>;

    /// Number of stored points
    async fn count(&self) -> Result<usize>;

    /// Escape hatch for driver-specific operations
    fn as_any(&self) -> &dyn Any;
}

/// Distance metric of a collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    #[default]
    Cosine,
    Dot,
    #[serde(alias = "l2", alias = "euclid")]
    Euclidean,
}

impl DistanceMetric {
    /// Whether lower raw scores are better
    pub fn is_distance(self) -> bool {
        matches!(self, Self::Euclidean)
    }

    /// Map a raw backend score onto a similarity where higher is better
    pub fn to_similarity(self, raw: f32) -> f32 {
        match self {
            Self::Cosine | Self::Dot => raw,
            Self::Euclidean => 1.0 / (1.0 + raw.max(0.0)),
        }
    }
}

/// A point as written to a backend
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedPoint {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: Payload,
}

/// A point returned by a similarity search
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPoint {
    pub id: String,
    pub payload: Payload,
    /// Raw from drivers, normalized similarity from the facade; `None` if unreported
    pub score: Option<f32>,
}

/// Embed document contents in one batch call and pair them with payloads.
///
/// Fails with `InvalidInput` on empty content and with `Config` when the
/// embedding dimension differs from the collection's.
pub async fn embed_documents(
    embedder: &dyn Embedder,
    documents: &[Document],
    dimensions: usize,
) -> Result<Vec<EmbeddedPoint>> {
    if let Some(doc) = documents.iter().find(|d| d.content.trim().is_empty()) {
        return Err(RagwayError::InvalidInput(format!(
            "document {} has empty content",
            doc.id
        )));
    }
    if documents.is_empty() {
        return Ok(Vec::new());
    }

    let texts: Vec<String> = documents.iter().map(|d| d.content.clone()).collect();
    let vectors = embedder.embed_batch(&texts).await?;
    if vectors.len() != documents.len() {
        return Err(RagwayError::Llm(format!(
            "Expected {} embeddings, got {}",
            documents.len(),
            vectors.len()
        )));
    }

    documents
        .iter()
        .zip(vectors)
        .map(|(doc, vector)| {
            check_dimensions(&vector, dimensions)?;
            Ok(EmbeddedPoint {
                id: doc.id.clone(),
                vector,
                payload: doc.payload(),
            })
        })
        .collect()
}

/// Reject vectors whose length differs from the configured dimension
pub fn check_dimensions(vector: &[f32], dimensions: usize) -> Result<()> {
    if vector.len() != dimensions {
        return Err(RagwayError::Config(format!(
            "embedding dimension {} does not match configured vector dimension {}",
            vector.len(),
            dimensions
        )));
    }
    Ok(())
}

/// Flatten a JSON object into a string payload
pub(crate) fn payload_from_json(value: serde_json::Value, backend: &str) -> Result<Payload> {
    match value {
        serde_json::Value::Object(map) => Ok(map
            .into_iter()
            .filter_map(|(k, v)| match v {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some((k, s)),
                other => Some((k, other.to_string())),
            })
            .collect()),
        serde_json::Value::Null => Ok(Payload::new()),
        other => Err(RagwayError::backend(
            backend,
            format!("malformed payload: expected an object, got {}", other),
        )),
    }
}
