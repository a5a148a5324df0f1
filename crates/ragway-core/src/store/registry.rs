//! Provider name to driver lookup

use super::{MemoryBackend, MilvusBackend, QdrantBackend, VectorBackend};
use crate::config::VectorStoreConfig;
use crate::error::{RagwayError, Result};
use crate::llm::Embedder;
use std::collections::HashMap;
use std::sync::Arc;

/// Builds a driver from the store configuration and the shared embedder
pub type BackendFactory = Box<
    dyn Fn(&VectorStoreConfig, Arc<dyn Embedder>) -> Result<Arc<dyn VectorBackend>> + Send + Sync,
>;

/// Registry of available vector backend drivers
pub struct BackendRegistry {
    factories: HashMap<String, BackendFactory>,
}

impl BackendRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry with the built-in drivers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("qdrant", |config, embedder| {
            Ok(Arc::new(QdrantBackend::new(config, embedder)?) as Arc<dyn VectorBackend>)
        });
        registry.register("milvus", |config, embedder| {
            Ok(Arc::new(MilvusBackend::new(config, embedder)?) as Arc<dyn VectorBackend>)
        });
        registry.register("memory", |config, embedder| {
            Ok(Arc::new(MemoryBackend::new(config, embedder)) as Arc<dyn VectorBackend>)
        });
        registry
    }

    /// Register a driver, replacing any previous one with the same name
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&VectorStoreConfig, Arc<dyn Embedder>) -> Result<Arc<dyn VectorBackend>>
            + Send
            + Sync
            + 'static,
    {
        self.factories
            .insert(name.to_ascii_lowercase(), Box::new(factory));
    }

    /// Registered driver names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Instantiate the driver named by `config.provider`
    pub fn create(
        &self,
        config: &VectorStoreConfig,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Arc<dyn VectorBackend>> {
        let name = config.provider.trim().to_ascii_lowercase();
        let factory = self.factories.get(&name).ok_or_else(|| {
            RagwayError::Config(format!(
                "Unknown vector store provider '{}'. Available: {}",
                config.provider,
                self.names().join(", ")
            ))
        })?;
        tracing::debug!("Using {} vector backend", name);
        factory(config, embedder)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
