//! Milvus driver over the RESTful v2 API

use super::{
    check_dimensions, embed_documents, payload_from_json, DistanceMetric, ScoredPoint,
    VectorBackend,
};
use crate::config::{MilvusConfig, VectorStoreConfig};
use crate::document::{keys, Document, Payload};
use crate::error::{RagwayError, Result};
use crate::llm::Embedder;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

const NAME: &str = "milvus";
const VECTOR_FIELD: &str = "embedding";
const INDEX_NAME: &str = "embedding_index";
const ID_MAX_LENGTH: u32 = 256;
const CONTENT_MAX_LENGTH: u32 = 65535;

pub struct MilvusBackend {
    http_client: reqwest::Client,
    config: MilvusConfig,
    collection: String,
    dimensions: usize,
    metric: DistanceMetric,
    embedder: Arc<dyn Embedder>,
}

/// `{code, data, message}` envelope; a nonzero code is a failure even on HTTP 200
#[derive(Deserialize)]
struct MilvusResponse {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    message: Option<String>,
}

impl MilvusBackend {
    pub fn new(config: &VectorStoreConfig, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.milvus.timeout_secs))
            .build()?;
        let mut milvus = config.milvus.clone();
        milvus.url = milvus.url.trim_end_matches('/').to_string();
        Ok(Self {
            http_client,
            config: milvus,
            collection: config.collection.clone(),
            dimensions: config.dimensions,
            metric: config.metric,
            embedder,
        })
    }

    fn metric_type(&self) -> &'static str {
        match self.metric {
            DistanceMetric::Cosine => "COSINE",
            DistanceMetric::Dot => "IP",
            DistanceMetric::Euclidean => "L2",
        }
    }

    /// POST to `/v2/vectordb/{path}` and unwrap the response envelope
    async fn call(&self, path: &str, mut body: Value) -> Result<Value> {
        body["dbName"] = json!(self.config.database);

        let mut req = self
            .http_client
            .post(format!("{}/v2/vectordb/{}", self.config.url, path))
            .json(&body);
        if let Some(ref token) = self.config.token {
            req = req.bearer_auth(token);
        }

        let response = req
            .send()
            .await
            .map_err(|e| RagwayError::backend(NAME, e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(RagwayError::backend(
                NAME,
                format!("{} failed (HTTP {}): {}", path, status, text),
            ));
        }
        let envelope: MilvusResponse = response
            .json()
            .await
            .map_err(|e| RagwayError::backend(NAME, format!("malformed response: {}", e)))?;
        if envelope.code != 0 {
            return Err(RagwayError::backend(
                NAME,
                format!(
                    "{} failed (code {}): {}",
                    path,
                    envelope.code,
                    envelope.message.unwrap_or_default()
                ),
            ));
        }
        Ok(envelope.data)
    }

    async fn has_collection(&self) -> Result<bool> {
        let data = self
            .call(
                "collections/has",
                json!({ "collectionName": self.collection }),
            )
            .await?;
        Ok(data["has"].as_bool().unwrap_or(false))
    }

    fn collection_schema(&self) -> Value {
        json!({
            "collectionName": self.collection,
            "schema": {
                "autoId": false,
                "enableDynamicField": false,
                "fields": [
                    {
                        "fieldName": "id",
                        "dataType": "VarChar",
                        "isPrimary": true,
                        "elementTypeParams": { "max_length": ID_MAX_LENGTH }
                    },
                    {
                        "fieldName": "content",
                        "dataType": "VarChar",
                        "elementTypeParams": { "max_length": CONTENT_MAX_LENGTH }
                    },
                    { "fieldName": "metadata", "dataType": "JSON" },
                    {
                        "fieldName": VECTOR_FIELD,
                        "dataType": "FloatVector",
                        "elementTypeParams": { "dim": self.dimensions }
                    }
                ]
            },
            "params": { "shardsNum": self.config.shards }
        })
    }

    async fn create_collection(&self) -> Result<()> {
        match self.call("collections/create", self.collection_schema()).await {
            Ok(_) => {
                tracing::info!("Created Milvus collection {}", self.collection);
                Ok(())
            }
            Err(e) if e.to_string().contains("already exist") => Ok(()),
            Err(e) => Err(RagwayError::Provisioning(format!(
                "milvus: creating collection {} failed: {}",
                self.collection, e
            ))),
        }
    }

    async fn has_index(&self) -> Result<bool> {
        let data = self
            .call(
                "indexes/describe",
                json!({ "collectionName": self.collection, "indexName": INDEX_NAME }),
            )
            .await?;
        Ok(data.as_array().map(|a| !a.is_empty()).unwrap_or(false))
    }

    async fn create_index(&self) -> Result<()> {
        let body = json!({
            "collectionName": self.collection,
            "indexParams": [{
                "fieldName": VECTOR_FIELD,
                "indexName": INDEX_NAME,
                "metricType": self.metric_type(),
                "indexType": self.config.index_type,
                "params": { "nlist": self.config.nlist }
            }]
        });
        match self.call("indexes/create", body).await {
            Ok(_) => {
                tracing::info!("Created {} index on {}", self.config.index_type, self.collection);
                Ok(())
            }
            Err(e) if e.to_string().contains("already exist") => Ok(()),
            Err(e) => Err(RagwayError::Provisioning(format!(
                "milvus: creating index {} failed: {}",
                INDEX_NAME, e
            ))),
        }
    }

    /// Rebuild a payload from the scalar fields of an entity
    fn entity_payload(&self, entity: &Value) -> Result<Payload> {
        let mut payload = payload_from_json(entity["metadata"].clone(), NAME)?;
        if let Some(content) = entity["content"].as_str() {
            payload.insert(keys::CONTENT.to_string(), content.to_string());
        }
        if let Some(id) = entity["id"].as_str() {
            payload
                .entry(keys::DOC_ID.to_string())
                .or_insert_with(|| id.to_string());
        }
        Ok(payload)
    }
}

#[async_trait]
impl VectorBackend for MilvusBackend {
    fn name(&self) -> &str {
        NAME
    }

    fn metric(&self) -> DistanceMetric {
        self.metric
    }

    async fn ping(&self) -> Result<()> {
        self.call("collections/list", json!({})).await.map(|_| ())
    }

    async fn ensure_schema(&self) -> Result<()> {
        match self.has_collection().await {
            Ok(true) => tracing::debug!("Milvus collection {} exists", self.collection),
            Ok(false) => self.create_collection().await?,
            Err(e) => {
                tracing::warn!(
                    "Could not check Milvus collection {}: {}; attempting to create it",
                    self.collection,
                    e
                );
                self.create_collection().await?;
            }
        }

        match self.has_index().await {
            Ok(true) => tracing::debug!("Milvus index {} exists", INDEX_NAME),
            Ok(false) => self.create_index().await?,
            Err(e) => {
                tracing::warn!("Could not describe index {}: {}; creating it", INDEX_NAME, e);
                self.create_index().await?;
            }
        }

        self.call(
            "collections/load",
            json!({ "collectionName": self.collection }),
        )
        .await
        .map_err(|e| RagwayError::Provisioning(format!("milvus: loading collection: {}", e)))?;
        Ok(())
    }

    async fn upsert(&self, documents: &[Document]) -> Result<usize> {
        let points = embed_documents(self.embedder.as_ref(), documents, self.dimensions).await?;
        if points.is_empty() {
            return Ok(0);
        }

        let data: Vec<Value> = points
            .iter()
            .map(|p| {
                let metadata: serde_json::Map<String, Value> = p
                    .payload
                    .iter()
                    .filter(|(k, _)| k.as_str() != keys::CONTENT)
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect();
                json!({
                    "id": p.id,
                    "content": p.payload.get(keys::CONTENT).cloned().unwrap_or_default(),
                    "metadata": metadata,
                    "embedding": p.vector,
                })
            })
            .collect();

        self.call(
            "entities/upsert",
            json!({ "collectionName": self.collection, "data": data }),
        )
        .await?;
        tracing::debug!("Upserted {} entities into {}", points.len(), self.collection);
        Ok(points.len())
    }

    async fn delete_all(&self) -> Result<()> {
        self.call(
            "entities/delete",
            json!({ "collectionName": self.collection, "filter": "id != \"\"" }),
        )
        .await?;
        Ok(())
    }

    async fn similarity_search(
        &self,
        vector: &[f32],
        top_k: usize,
        _min_score: f32,
    ) -> Result<Vec<ScoredPoint>> {
        check_dimensions(vector, self.dimensions)?;

        let data = self
            .call(
                "entities/search",
                json!({
                    "collectionName": self.collection,
                    "data": [vector],
                    "annsField": VECTOR_FIELD,
                    "limit": top_k,
                    "outputFields": ["id", "content", "metadata"],
                    "searchParams": {
                        "metricType": self.metric_type(),
                        "params": { "nprobe": self.config.nprobe }
                    }
                }),
            )
            .await?;

        let hits = match data {
            Value::Array(hits) => hits,
            Value::Null => Vec::new(),
            other => {
                return Err(RagwayError::backend(
                    NAME,
                    format!("malformed search result: {}", other),
                ))
            }
        };

        hits.iter()
            .map(|hit| {
                let payload = self.entity_payload(hit)?;
                let id = payload
                    .get(keys::DOC_ID)
                    .cloned()
                    .unwrap_or_else(|| hit["id"].to_string());
                Ok(ScoredPoint {
                    id,
                    payload,
                    score: hit["distance"].as_f64().map(|d| d as f32),
                })
            })
            .collect()
    }

    async fn count(&self) -> Result<usize> {
        let data = self
            .call(
                "entities/query",
                json!({
                    "collectionName": self.collection,
                    "filter": "",
                    "outputFields": ["count(*)"]
                }),
            )
            .await?;
        data[0]["count(*)"]
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| RagwayError::backend(NAME, format!("malformed count result: {}", data)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
