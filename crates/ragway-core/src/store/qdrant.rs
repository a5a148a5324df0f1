//! Qdrant driver over the REST API

use super::{
    check_dimensions, embed_documents, payload_from_json, DistanceMetric, ScoredPoint,
    VectorBackend,
};
use crate::config::VectorStoreConfig;
use crate::document::{keys, Document};
use crate::error::{RagwayError, Result};
use crate::llm::Embedder;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

const NAME: &str = "qdrant";

pub struct QdrantBackend {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    collection: String,
    dimensions: usize,
    metric: DistanceMetric,
    embedder: Arc<dyn Embedder>,
}

/// Envelope every Qdrant response is wrapped in
#[derive(Deserialize)]
struct QdrantResponse<T> {
    result: T,
}

#[derive(Deserialize)]
struct ExistsResult {
    exists: bool,
}

#[derive(Deserialize)]
struct CountResult {
    count: usize,
}

#[derive(Deserialize)]
struct SearchHit {
    id: serde_json::Value,
    score: Option<f32>,
    #[serde(default)]
    payload: serde_json::Value,
}

#[derive(Serialize)]
struct PointStruct<'a> {
    id: String,
    vector: &'a [f32],
    payload: &'a crate::document::Payload,
}

impl QdrantBackend {
    pub fn new(config: &VectorStoreConfig, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.qdrant.timeout_secs))
            .build()?;
        Ok(Self {
            http_client,
            base_url: config.qdrant.url.trim_end_matches('/').to_string(),
            api_key: config.qdrant.api_key.clone(),
            collection: config.collection.clone(),
            dimensions: config.dimensions,
            metric: config.metric,
            embedder,
        })
    }

    fn collection_url(&self, path: &str) -> String {
        format!("{}/collections/{}{}", self.base_url, self.collection, path)
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        let req = self.http_client.request(method, url);
        match self.api_key {
            Some(ref key) => req.header("api-key", key),
            None => req,
        }
    }

    async fn send<T: serde::de::DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<T> {
        let response = req
            .send()
            .await
            .map_err(|e| RagwayError::backend(NAME, e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RagwayError::backend(
                NAME,
                format!("HTTP {}: {}", status, body),
            ));
        }
        let envelope: QdrantResponse<T> = response
            .json()
            .await
            .map_err(|e| RagwayError::backend(NAME, format!("malformed response: {}", e)))?;
        Ok(envelope.result)
    }

    fn distance_name(&self) -> &'static str {
        match self.metric {
            DistanceMetric::Cosine => "Cosine",
            DistanceMetric::Dot => "Dot",
            DistanceMetric::Euclidean => "Euclid",
        }
    }

    async fn collection_exists(&self) -> Result<bool> {
        let result: ExistsResult = self
            .send(self.request(reqwest::Method::GET, self.collection_url("/exists")))
            .await?;
        Ok(result.exists)
    }

    async fn create_collection(&self) -> Result<()> {
        let body = json!({
            "vectors": { "size": self.dimensions, "distance": self.distance_name() }
        });
        let response = self
            .request(reqwest::Method::PUT, self.collection_url(""))
            .json(&body)
            .send()
            .await
            .map_err(|e| RagwayError::Provisioning(format!("qdrant: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            tracing::info!("Created Qdrant collection {}", self.collection);
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        // Another process may have created it between the check and now
        if status == reqwest::StatusCode::CONFLICT || text.contains("already exists") {
            tracing::debug!("Qdrant collection {} already exists", self.collection);
            return Ok(());
        }
        Err(RagwayError::Provisioning(format!(
            "qdrant: creating collection {} failed (HTTP {}): {}",
            self.collection, status, text
        )))
    }
}

/// Deterministic UUID-formatted point id for a document id
pub fn point_uuid(doc_id: &str) -> String {
    let digest = Sha256::digest(doc_id.as_bytes());
    let hex: String = digest[..16].iter().map(|b| format!("{:02x}", b)).collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

#[async_trait]
impl VectorBackend for QdrantBackend {
    fn name(&self) -> &str {
        NAME
    }

    fn metric(&self) -> DistanceMetric {
        self.metric
    }

    async fn ping(&self) -> Result<()> {
        let response = self
            .request(reqwest::Method::GET, format!("{}/readyz", self.base_url))
            .send()
            .await
            .map_err(|e| RagwayError::backend(NAME, e.to_string()))?;
        if !response.status().is_success() {
            return Err(RagwayError::backend(
                NAME,
                format!("not ready (HTTP {})", response.status()),
            ));
        }
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        match self.collection_exists().await {
            Ok(true) => {
                tracing::debug!("Qdrant collection {} exists", self.collection);
                Ok(())
            }
            Ok(false) => self.create_collection().await,
            Err(e) => {
                tracing::warn!(
                    "Could not check Qdrant collection {}: {}; attempting to create it",
                    self.collection,
                    e
                );
                self.create_collection().await
            }
        }
    }

    async fn upsert(&self, documents: &[Document]) -> Result<usize> {
        let points = embed_documents(self.embedder.as_ref(), documents, self.dimensions).await?;
        if points.is_empty() {
            return Ok(0);
        }

        let body: Vec<PointStruct<'_>> = points
            .iter()
            .map(|p| PointStruct {
                id: point_uuid(&p.id),
                vector: &p.vector,
                payload: &p.payload,
            })
            .collect();

        let _: serde_json::Value = self
            .send(
                self.request(reqwest::Method::PUT, self.collection_url("/points?wait=true"))
                    .json(&json!({ "points": body })),
            )
            .await?;
        tracing::debug!("Upserted {} points into {}", points.len(), self.collection);
        Ok(points.len())
    }

    async fn delete_all(&self) -> Result<()> {
        // An empty filter matches every point
        let _: serde_json::Value = self
            .send(
                self.request(
                    reqwest::Method::POST,
                    self.collection_url("/points/delete?wait=true"),
                )
                .json(&json!({ "filter": {} })),
            )
            .await?;
        Ok(())
    }

    async fn similarity_search(
        &self,
        vector: &[f32],
        top_k: usize,
        min_score: f32,
    ) -> Result<Vec<ScoredPoint>> {
        check_dimensions(vector, self.dimensions)?;

        let mut body = json!({
            "vector": vector,
            "limit": top_k,
            "with_payload": true,
        });
        if !self.metric.is_distance() {
            body["score_threshold"] = json!(min_score);
        }

        let hits: Vec<SearchHit> = self
            .send(
                self.request(reqwest::Method::POST, self.collection_url("/points/search"))
                    .json(&body),
            )
            .await?;

        hits.into_iter()
            .map(|hit| {
                let payload = payload_from_json(hit.payload, NAME)?;
                let id = match payload.get(keys::DOC_ID) {
                    Some(doc_id) => doc_id.clone(),
                    None => match hit.id {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    },
                };
                Ok(ScoredPoint {
                    id,
                    payload,
                    score: hit.score,
                })
            })
            .collect()
    }

    async fn count(&self) -> Result<usize> {
        let result: CountResult = self
            .send(
                self.request(reqwest::Method::POST, self.collection_url("/points/count"))
                    .json(&json!({ "exact": true })),
            )
            .await?;
        Ok(result.count)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
