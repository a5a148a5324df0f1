//! Test doubles shared by the integration suites

#![allow(dead_code)]

pub mod http;

use async_trait::async_trait;
use ragway_core::config::{Config, VectorStoreConfig};
use ragway_core::llm::{ChatModel, Embedder};
use ragway_core::store::{MemoryBackend, ScoredPoint, VectorBackend};
use ragway_core::{DistanceMetric, Document, Gateway, RagwayError, Result, VectorStore};
use std::any::Any;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Keywords mapped onto the first axes; text matching none lands on the last axis
pub const KEYWORDS: [&str; 7] = [
    "machine learning",
    "cloud",
    "blockchain",
    "climate",
    "genome",
    "quantum",
    "remote work",
];
pub const DIMS: usize = KEYWORDS.len() + 1;

/// Deterministic bag-of-keywords embedder producing unit vectors
#[derive(Default)]
pub struct KeywordEmbedder {
    pub calls: AtomicUsize,
}

impl KeywordEmbedder {
    pub fn vector(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        let mut v: Vec<f32> = KEYWORDS
            .iter()
            .map(|k| lower.matches(k).count() as f32)
            .collect();
        v.push(0.0);
        if v.iter().all(|x| *x == 0.0) {
            v[DIMS - 1] = 1.0;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        v.iter().map(|x| x / norm).collect()
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }

    fn model_name(&self) -> &str {
        "keyword"
    }
}

/// Chat model answering with a fixed reply and recording prompts
pub struct ScriptedChat {
    reply: String,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedChat {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ChatModel for ScriptedChat {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Chat model whose service is down
pub struct FailingChat;

#[async_trait]
impl ChatModel for FailingChat {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(RagwayError::ExternalError(
            "Ollama error (HTTP 503 Service Unavailable): model loading".to_string(),
        ))
    }

    fn model_name(&self) -> &str {
        "failing"
    }
}

/// Backend returning canned hits, optionally after a delay, counting every call
pub struct StaticBackend {
    pub hits: Vec<ScoredPoint>,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
}

impl StaticBackend {
    pub fn new(hits: Vec<ScoredPoint>) -> Self {
        Self {
            hits,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl VectorBackend for StaticBackend {
    fn name(&self) -> &str {
        "static"
    }

    fn metric(&self) -> DistanceMetric {
        DistanceMetric::Cosine
    }

    async fn ping(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn upsert(&self, documents: &[Document]) -> Result<usize> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(documents.len())
    }

    async fn delete_all(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn similarity_search(
        &self,
        _vector: &[f32],
        top_k: usize,
        _min_score: f32,
    ) -> Result<Vec<ScoredPoint>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.hits.iter().take(top_k).cloned().collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.hits.len())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// In-memory backend that is unreachable for the first `failures` pings
pub struct FlakyBackend {
    pub inner: MemoryBackend,
    failures: AtomicU32,
    pub pings: AtomicU32,
}

impl FlakyBackend {
    pub fn new(inner: MemoryBackend, failures: u32) -> Self {
        Self {
            inner,
            failures: AtomicU32::new(failures),
            pings: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl VectorBackend for FlakyBackend {
    fn name(&self) -> &str {
        "flaky"
    }

    fn metric(&self) -> DistanceMetric {
        self.inner.metric()
    }

    async fn ping(&self) -> Result<()> {
        self.pings.fetch_add(1, Ordering::SeqCst);
        let left = self.failures.load(Ordering::SeqCst);
        if left > 0 {
            self.failures.store(left - 1, Ordering::SeqCst);
            return Err(RagwayError::backend("flaky", "connection refused"));
        }
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.inner.ensure_schema().await
    }

    async fn upsert(&self, documents: &[Document]) -> Result<usize> {
        self.inner.upsert(documents).await
    }

    async fn delete_all(&self) -> Result<()> {
        self.inner.delete_all().await
    }

    async fn similarity_search(
        &self,
        vector: &[f32],
        top_k: usize,
        min_score: f32,
    ) -> Result<Vec<ScoredPoint>> {
        self.inner.similarity_search(vector, top_k, min_score).await
    }

    async fn count(&self) -> Result<usize> {
        self.inner.count().await
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// In-memory backend that behaves like a collection nobody has created yet:
/// every data operation is a 404 until `ensure_schema` runs
pub struct FreshBackend {
    pub inner: MemoryBackend,
    pub provisioned: AtomicBool,
}

impl FreshBackend {
    pub fn new(inner: MemoryBackend) -> Self {
        Self {
            inner,
            provisioned: AtomicBool::new(false),
        }
    }

    fn require_collection(&self) -> Result<()> {
        if self.provisioned.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RagwayError::backend(
                "fresh",
                "HTTP 404: Collection `documents` doesn't exist!",
            ))
        }
    }
}

#[async_trait]
impl VectorBackend for FreshBackend {
    fn name(&self) -> &str {
        "fresh"
    }

    fn metric(&self) -> DistanceMetric {
        self.inner.metric()
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.provisioned.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn upsert(&self, documents: &[Document]) -> Result<usize> {
        self.require_collection()?;
        self.inner.upsert(documents).await
    }

    async fn delete_all(&self) -> Result<()> {
        self.require_collection()?;
        self.inner.delete_all().await
    }

    async fn similarity_search(
        &self,
        vector: &[f32],
        top_k: usize,
        min_score: f32,
    ) -> Result<Vec<ScoredPoint>> {
        self.require_collection()?;
        self.inner.similarity_search(vector, top_k, min_score).await
    }

    async fn count(&self) -> Result<usize> {
        self.require_collection()?;
        self.inner.count().await
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub fn store_config(metric: DistanceMetric) -> VectorStoreConfig {
    let mut config = VectorStoreConfig::default();
    config.provider = "memory".to_string();
    config.dimensions = DIMS;
    config.metric = metric;
    config
}

pub fn test_config(metric: DistanceMetric) -> Config {
    let mut config = Config::default();
    config.vector_store = store_config(metric);
    config
}

/// Memory-backed store built through the registry
pub fn memory_store(metric: DistanceMetric) -> VectorStore {
    VectorStore::from_config(&store_config(metric), Arc::new(KeywordEmbedder::default()))
        .expect("memory store")
}

/// Gateway over a freshly seeded memory backend
pub async fn seeded_gateway(metric: DistanceMetric, chat: Arc<dyn ChatModel>) -> Gateway {
    let gateway = Gateway::new(test_config(metric), memory_store(metric), chat);
    gateway.reseed_report().await.expect("seed");
    gateway
}
