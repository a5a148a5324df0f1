//! Request orchestration: search, health and reseed

use crate::config::Config;
use crate::corpus::{SeedReport, Seeder};
use crate::error::Result;
use crate::llm::{create_client, ChatModel, HttpChatModel, HttpEmbedder};
use crate::search::{GenerationComposer, SearchPipeline, SearchRequest, SearchResponse};
use crate::store::VectorStore;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Static liveness answer
pub const HEALTH_MESSAGE: &str = "Search service is running";

/// Answer of a successful reseed
pub const RESEED_SUCCESS: &str = "Data initialized successfully";

/// Prefix of the answer of a failed reseed
pub const RESEED_FAILURE_PREFIX: &str = "Failed to initialize data: ";

/// Snapshot of the gateway's wiring and collection size
#[derive(Debug, Clone, Serialize)]
pub struct GatewayStatus {
    pub provider: String,
    pub collection: String,
    pub dimensions: usize,
    pub documents: usize,
    pub embedding_model: String,
    pub chat_model: String,
}

/// Owns the vector store, seeder and pipeline for the lifetime of the process
pub struct Gateway {
    config: Config,
    store: VectorStore,
    seeder: Seeder,
    pipeline: SearchPipeline,
    composer: GenerationComposer,
    chat: Arc<dyn ChatModel>,
}

impl Gateway {
    /// Wire every component from configuration
    pub fn from_config(config: Config) -> Result<Self> {
        config.validate()?;
        let client = create_client(config.llm.clone())?;
        let embedder = Arc::new(HttpEmbedder::new(client.clone()));
        let chat = Arc::new(HttpChatModel::new(client));
        let store = VectorStore::from_config(&config.vector_store, embedder)?;
        Ok(Self::new(config, store, chat))
    }

    /// Wire from an already built store and chat model
    pub fn new(config: Config, store: VectorStore, chat: Arc<dyn ChatModel>) -> Self {
        Self::with_seeder(config, store.clone(), chat, Seeder::new(store))
    }

    pub fn with_seeder(
        config: Config,
        store: VectorStore,
        chat: Arc<dyn ChatModel>,
        seeder: Seeder,
    ) -> Self {
        let pipeline = SearchPipeline::new(store.clone(), config.search.clone());
        let composer = GenerationComposer::new(chat.clone(), config.search.generation_timeout());
        Self {
            config,
            store,
            seeder,
            pipeline,
            composer,
            chat,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    /// Startup provisioning and seeding; logs instead of failing
    pub async fn start(&self) -> Option<SeedReport> {
        if !self.config.seeding.enabled {
            self.provision().await;
            return None;
        }
        self.seeder.seed_on_startup(&self.config.seeding).await
    }

    /// Best-effort collection and index provisioning
    pub async fn provision(&self) -> bool {
        self.seeder.provision().await
    }

    /// Retrieve similar documents and generate a grounded answer.
    ///
    /// Invalid requests fail before any backend call. Retrieval failures
    /// propagate; generation failures are reported inside `ai_answer`.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let max_results = request.validate(self.config.search.default_max_results)?;
        tracing::info!("Received search request: {}", request.query);

        let start = Instant::now();
        let documents = self.pipeline.retrieve(&request.query, max_results).await?;
        let search_time_ms = start.elapsed().as_millis() as u64;

        let ai_answer = self.composer.compose(&request.query, &documents).await;

        Ok(SearchResponse {
            query: request.query.clone(),
            ai_answer,
            similar_documents: documents,
            search_time_ms,
        })
    }

    pub fn health(&self) -> &'static str {
        HEALTH_MESSAGE
    }

    /// Reseed and render the outcome as the operation's answer text
    pub async fn reseed(&self) -> String {
        match self.reseed_report().await {
            Ok(_) => RESEED_SUCCESS.to_string(),
            Err(e) => {
                tracing::error!("Error initializing data: {}", e);
                format!("{}{}", RESEED_FAILURE_PREFIX, e)
            }
        }
    }

    pub async fn reseed_report(&self) -> Result<SeedReport> {
        self.seeder.reseed().await
    }

    pub async fn status(&self) -> Result<GatewayStatus> {
        Ok(GatewayStatus {
            provider: self.store.provider().to_string(),
            collection: self.config.vector_store.collection.clone(),
            dimensions: self.config.vector_store.dimensions,
            documents: self.store.count().await?,
            embedding_model: self.store.embedder().model_name().to_string(),
            chat_model: self.chat.model_name().to_string(),
        })
    }
}
