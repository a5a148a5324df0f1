//! Configuration management

use crate::error::{RagwayError, Result};
use crate::store::DistanceMetric;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Vector backend selection and connection parameters
    #[serde(default)]
    pub vector_store: VectorStoreConfig,

    /// Embedding and chat service configuration
    #[serde(default)]
    pub llm: LLMServiceConfig,

    /// Retrieval tuning
    #[serde(default)]
    pub search: SearchConfig,

    /// Startup corpus seeding
    #[serde(default)]
    pub seeding: SeedingConfig,
}

/// Which vector backend driver to use and how to reach it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    /// Registered driver name (`qdrant`, `milvus`, `memory`)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Collection holding the corpus
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Vector dimension D; must match the embedding model output
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    /// Distance metric used when creating the collection and ranking hits
    #[serde(default)]
    pub metric: DistanceMetric,

    #[serde(default)]
    pub qdrant: QdrantConfig,

    #[serde(default)]
    pub milvus: MilvusConfig,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            collection: default_collection(),
            dimensions: default_dimensions(),
            metric: DistanceMetric::default(),
            qdrant: QdrantConfig::default(),
            milvus: MilvusConfig::default(),
        }
    }
}

fn default_provider() -> String {
    std::env::var("RAGWAY_VECTOR_STORE").unwrap_or_else(|_| "qdrant".to_string())
}

fn default_collection() -> String {
    "documents".to_string()
}

fn default_dimensions() -> usize {
    std::env::var("RAGWAY_EMBEDDING_DIMS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(1024)
}

/// Qdrant REST endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    #[serde(default = "default_qdrant_url")]
    pub url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: default_qdrant_url(),
            api_key: std::env::var("RAGWAY_QDRANT_API_KEY").ok(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_qdrant_url() -> String {
    std::env::var("RAGWAY_QDRANT_URL").unwrap_or_else(|_| "http://localhost:6333".to_string())
}

/// Milvus REST (v2) endpoint and index parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilvusConfig {
    #[serde(default = "default_milvus_url")]
    pub url: String,

    /// `user:password` or an API token, sent as a bearer credential
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_milvus_database")]
    pub database: String,

    #[serde(default = "default_index_type")]
    pub index_type: String,

    #[serde(default = "default_nlist")]
    pub nlist: u32,

    #[serde(default = "default_nprobe")]
    pub nprobe: u32,

    #[serde(default = "default_shards")]
    pub shards: u32,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for MilvusConfig {
    fn default() -> Self {
        Self {
            url: default_milvus_url(),
            token: std::env::var("RAGWAY_MILVUS_TOKEN").ok(),
            database: default_milvus_database(),
            index_type: default_index_type(),
            nlist: default_nlist(),
            nprobe: default_nprobe(),
            shards: default_shards(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_milvus_url() -> String {
    std::env::var("RAGWAY_MILVUS_URL").unwrap_or_else(|_| "http://localhost:19530".to_string())
}

fn default_milvus_database() -> String {
    "default".to_string()
}

fn default_index_type() -> String {
    "IVF_FLAT".to_string()
}

fn default_nlist() -> u32 {
    128
}

fn default_nprobe() -> u32 {
    16
}

fn default_shards() -> u32 {
    2
}

/// Wire protocol spoken by the LLM service
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Ollama native API (`/api/embed`, `/api/chat`, `/api/pull`)
    #[default]
    Ollama,
    /// OpenAI-compatible API (`/v1/embeddings`, `/v1/chat/completions`)
    #[serde(alias = "vllm")]
    OpenAi,
}

impl std::str::FromStr for LlmProvider {
    type Err = RagwayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" | "vllm" => Ok(Self::OpenAi),
            other => Err(RagwayError::Config(format!("unknown LLM provider: {}", other))),
        }
    }
}

/// LLM service configuration for external inference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMServiceConfig {
    #[serde(default)]
    pub provider: LlmProvider,

    /// Base URL of the LLM service for chat/completions
    #[serde(default = "default_llm_url")]
    pub url: String,

    /// Model name for chat completions
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// Base URL for embeddings service (can be different from LLM URL)
    #[serde(default)]
    pub embedding_url: Option<String>,

    /// Model name for embeddings
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// API key (optional, for authenticated services)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    /// Pull models the service does not have yet on first use (Ollama only)
    #[serde(default = "default_true")]
    pub pull_missing_models: bool,
}

impl LLMServiceConfig {
    /// Get the embeddings URL (falls back to main URL if not specified)
    pub fn embeddings_url(&self) -> &str {
        self.embedding_url.as_deref().unwrap_or(&self.url)
    }
}

impl Default for LLMServiceConfig {
    fn default() -> Self {
        Self {
            provider: std::env::var("RAGWAY_LLM_PROVIDER")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            url: default_llm_url(),
            model: default_chat_model(),
            embedding_url: std::env::var("RAGWAY_EMBEDDING_URL").ok(),
            embedding_model: default_embedding_model(),
            api_key: std::env::var("RAGWAY_LLM_API_KEY").ok(),
            timeout_secs: default_llm_timeout(),
            pull_missing_models: true,
        }
    }
}

fn default_llm_url() -> String {
    std::env::var("RAGWAY_LLM_URL").unwrap_or_else(|_| "http://localhost:11434".to_string())
}

fn default_chat_model() -> String {
    std::env::var("RAGWAY_CHAT_MODEL").unwrap_or_else(|_| "llama3.2".to_string())
}

fn default_embedding_model() -> String {
    std::env::var("RAGWAY_EMBEDDING_MODEL").unwrap_or_else(|_| "mxbai-embed-large".to_string())
}

fn default_timeout() -> u64 {
    30
}

fn default_llm_timeout() -> u64 {
    120
}

fn default_true() -> bool {
    true
}

/// Retrieval and generation tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Hits scoring below this similarity are dropped
    #[serde(default = "default_threshold")]
    pub similarity_threshold: f32,

    /// Used by callers that do not pass `maxResults`
    #[serde(default = "default_max_results")]
    pub default_max_results: usize,

    /// Budget for embedding + similarity search of one request
    #[serde(default = "default_timeout")]
    pub retrieval_timeout_secs: u64,

    /// Budget for the chat call of one request
    #[serde(default = "default_llm_timeout")]
    pub generation_timeout_secs: u64,
}

impl SearchConfig {
    pub fn retrieval_timeout(&self) -> Duration {
        Duration::from_secs(self.retrieval_timeout_secs)
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_threshold(),
            default_max_results: default_max_results(),
            retrieval_timeout_secs: default_timeout(),
            generation_timeout_secs: default_llm_timeout(),
        }
    }
}

fn default_threshold() -> f32 {
    0.7
}

fn default_max_results() -> usize {
    4
}

/// Startup seeding: readiness probing with exponential backoff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedingConfig {
    /// Seed the demo corpus when the gateway starts
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,
}

impl SeedingConfig {
    /// Delay before retry number `attempt` (1-based), doubling up to the cap
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        let ms = self
            .initial_backoff_ms
            .saturating_mul(1u64 << exp)
            .min(self.max_backoff_ms);
        Duration::from_millis(ms)
    }
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
        }
    }
}

fn default_max_attempts() -> u32 {
    10
}

fn default_initial_backoff() -> u64 {
    500
}

fn default_max_backoff() -> u64 {
    8_000
}

impl Config {
    /// Load config from `RAGWAY_CONFIG` or the default path
    pub fn load() -> Result<Self> {
        let path = std::env::var("RAGWAY_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_path());
        Self::load_from(&path)
    }

    /// Load config from a YAML file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_yaml::from_str(&content)?
        } else {
            Config::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Save config to the given path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Reject values that would make the pipeline misbehave silently
    pub fn validate(&self) -> Result<()> {
        if self.vector_store.dimensions == 0 {
            return Err(RagwayError::Config(
                "vector_store.dimensions must be positive".to_string(),
            ));
        }
        if self.vector_store.collection.trim().is_empty() {
            return Err(RagwayError::Config(
                "vector_store.collection must not be empty".to_string(),
            ));
        }
        let threshold = self.search.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(RagwayError::Config(format!(
                "search.similarity_threshold must be within [0, 1], got {}",
                threshold
            )));
        }
        if self.search.default_max_results == 0 {
            return Err(RagwayError::Config(
                "search.default_max_results must be at least 1".to_string(),
            ));
        }
        if self.seeding.max_attempts == 0 {
            return Err(RagwayError::Config(
                "seeding.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
