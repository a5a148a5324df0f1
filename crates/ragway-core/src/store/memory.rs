//! In-process brute-force backend
//!
//! Used for local development and tests; the whole collection lives in a
//! `Vec` and every search scans it.

use super::{check_dimensions, embed_documents, DistanceMetric, EmbeddedPoint, ScoredPoint, VectorBackend};
use crate::config::VectorStoreConfig;
use crate::document::Document;
use crate::error::Result;
use crate::llm::Embedder;
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;
use tokio::sync::RwLock;

const NAME: &str = "memory";

pub struct MemoryBackend {
    points: RwLock<Vec<EmbeddedPoint>>,
    dimensions: usize,
    metric: DistanceMetric,
    embedder: Arc<dyn Embedder>,
}

impl MemoryBackend {
    pub fn new(config: &VectorStoreConfig, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            points: RwLock::new(Vec::new()),
            dimensions: config.dimensions,
            metric: config.metric,
            embedder,
        }
    }

    /// Snapshot of stored points in insertion order
    pub async fn points(&self) -> Vec<EmbeddedPoint> {
        self.points.read().await.clone()
    }

    fn raw_score(&self, a: &[f32], b: &[f32]) -> f32 {
        match self.metric {
            DistanceMetric::Cosine => cosine_similarity(a, b),
            DistanceMetric::Dot => a.iter().zip(b).map(|(x, y)| x * y).sum(),
            DistanceMetric::Euclidean => a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f32>()
                .sqrt(),
        }
    }
}

/// Cosine similarity; zero when either vector has no magnitude
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorBackend for MemoryBackend {
    fn name(&self) -> &str {
        NAME
    }

    fn metric(&self) -> DistanceMetric {
        self.metric
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn upsert(&self, documents: &[Document]) -> Result<usize> {
        let batch = embed_documents(self.embedder.as_ref(), documents, self.dimensions).await?;
        let written = batch.len();

        let mut points = self.points.write().await;
        for point in batch {
            match points.iter_mut().find(|p| p.id == point.id) {
                Some(existing) => *existing = point,
                None => points.push(point),
            }
        }
        Ok(written)
    }

    async fn delete_all(&self) -> Result<()> {
        self.points.write().await.clear();
        Ok(())
    }

    async fn similarity_search(
        &self,
        vector: &[f32],
        top_k: usize,
        _min_score: f32,
    ) -> Result<Vec<ScoredPoint>> {
        check_dimensions(vector, self.dimensions)?;

        let points = self.points.read().await;
        let mut scored: Vec<ScoredPoint> = points
            .iter()
            .map(|p| ScoredPoint {
                id: p.id.clone(),
                payload: p.payload.clone(),
                score: Some(self.raw_score(vector, &p.vector)),
            })
            .collect();

        let ascending = self.metric.is_distance();
        // Stable sort keeps insertion order among equal scores
        scored.sort_by(|a, b| {
            let (a, b) = (a.score.unwrap_or(0.0), b.score.unwrap_or(0.0));
            let ord = a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.points.read().await.len())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
