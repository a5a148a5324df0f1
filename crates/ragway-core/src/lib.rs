//! Ragway Core Library
//!
//! Retrieval-augmented generation over pluggable vector databases.
//!
//! # Features
//! - Qdrant, Milvus and in-memory vector backends behind one facade
//! - Ollama and OpenAI-compatible embedding and chat clients
//! - Deterministic seeding of a demo corpus with readiness backoff
//! - Threshold-filtered similarity search with grounded answer generation

pub mod config;
pub mod corpus;
pub mod document;
pub mod error;
pub mod gateway;
pub mod llm;
pub mod search;
pub mod store;

pub use config::{Config, LLMServiceConfig, LlmProvider, SearchConfig, SeedingConfig, VectorStoreConfig};
pub use corpus::{demo_corpus, SeedReport, Seeder};
pub use document::{Document, Payload};
pub use error::{Error, RagwayError, Result};
pub use gateway::{Gateway, GatewayStatus, HEALTH_MESSAGE, RESEED_FAILURE_PREFIX, RESEED_SUCCESS};
pub use llm::{ChatMessage, ChatModel, Embedder, HttpChatModel, HttpEmbedder, LLMClient};
pub use search::{SearchRequest, SearchResponse, SearchResult};
pub use store::{BackendRegistry, DistanceMetric, ScoredPoint, VectorBackend, VectorStore};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "ragway";
