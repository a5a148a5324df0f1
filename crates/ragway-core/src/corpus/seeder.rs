//! Reset-and-reload of the demo corpus

use super::demo_corpus;
use crate::config::SeedingConfig;
use crate::document::Document;
use crate::error::{RagwayError, Result};
use crate::store::VectorStore;
use serde::Serialize;
use std::time::Instant;
use tokio::sync::Mutex;

/// Outcome of a successful reseed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub documents: usize,
    pub elapsed_ms: u64,
}

/// Loads a fixed corpus into the vector store.
///
/// Every reseed deletes everything first, so running it any number of times
/// leaves exactly the corpus behind. Concurrent calls are serialized.
pub struct Seeder {
    store: VectorStore,
    corpus: Vec<Document>,
    gate: Mutex<()>,
}

impl Seeder {
    /// Seeder for the built-in demo corpus
    pub fn new(store: VectorStore) -> Self {
        Self::with_corpus(store, demo_corpus())
    }

    pub fn with_corpus(store: VectorStore, corpus: Vec<Document>) -> Self {
        Self {
            store,
            corpus,
            gate: Mutex::new(()),
        }
    }

    pub fn corpus(&self) -> &[Document] {
        &self.corpus
    }

    /// Create the collection and index if missing. Failures are logged and
    /// retried by the next reseed.
    pub async fn provision(&self) -> bool {
        match self.store.ensure_schema().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Provisioning {} backend failed: {}", self.store.provider(), e);
                false
            }
        }
    }

    /// Provision, delete all points, then add the whole corpus in one batch
    pub async fn reseed(&self) -> Result<SeedReport> {
        let _guard = self.gate.lock().await;
        let start = Instant::now();

        self.provision().await;

        tracing::info!(
            "Reseeding {} backend with {} documents",
            self.store.provider(),
            self.corpus.len()
        );

        self.store
            .delete_all()
            .await
            .map_err(|e| RagwayError::Seeding(format!("deleting existing documents: {}", e)))?;

        let documents = self
            .store
            .add(&self.corpus)
            .await
            .map_err(|e| RagwayError::Seeding(format!("adding documents: {}", e)))?;

        let report = SeedReport {
            documents,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };
        tracing::info!(
            "Added {} documents in {}ms",
            report.documents,
            report.elapsed_ms
        );
        Ok(report)
    }

    /// Wait for the backend, then provision and reseed. Never fails; problems are logged.
    pub async fn seed_on_startup(&self, config: &SeedingConfig) -> Option<SeedReport> {
        if !config.enabled {
            tracing::debug!("Startup seeding disabled");
            return None;
        }

        if let Err(e) = self.wait_until_ready(config).await {
            tracing::error!("Skipping startup seeding: {}", e);
            return None;
        }

        match self.reseed().await {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::error!("Startup seeding failed: {}", e);
                None
            }
        }
    }

    async fn wait_until_ready(&self, config: &SeedingConfig) -> Result<()> {
        let mut attempt = 1;
        loop {
            match self.store.ready().await {
                Ok(()) => {
                    tracing::debug!("{} backend ready after {} attempt(s)", self.store.provider(), attempt);
                    return Ok(());
                }
                Err(e) if attempt >= config.max_attempts => {
                    return Err(RagwayError::Seeding(format!(
                        "{} backend not ready after {} attempts: {}",
                        self.store.provider(),
                        attempt,
                        e
                    )));
                }
                Err(e) => {
                    let delay = config.backoff(attempt);
                    tracing::warn!(
                        "{} backend not ready ({}), retrying in {:?}",
                        self.store.provider(),
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
