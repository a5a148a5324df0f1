//! Ollama native API client
//!
//! Models that the server does not have yet are pulled the first time they
//! are used, once per client.

use super::client::{build_http_client, check_status, ChatMessage, LLMClient};
use crate::config::LLMServiceConfig;
use crate::error::{RagwayError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

pub struct OllamaClient {
    http_client: reqwest::Client,
    config: LLMServiceConfig,
    chat_model_ready: OnceCell<()>,
    embedding_model_ready: OnceCell<()>,
}

#[derive(Serialize)]
struct ModelRequest<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Deserialize)]
struct PullResponse {
    status: String,
}

impl OllamaClient {
    pub fn new(config: LLMServiceConfig) -> Result<Self> {
        let http_client = build_http_client(config.timeout_secs)?;
        Ok(Self {
            http_client,
            config,
            chat_model_ready: OnceCell::new(),
            embedding_model_ready: OnceCell::new(),
        })
    }

    /// Make sure `model` exists on the server at `base_url`, pulling it if needed
    async fn ensure_model(&self, base_url: &str, model: &str) -> Result<()> {
        if !self.config.pull_missing_models {
            return Ok(());
        }

        let show = self
            .http_client
            .post(format!("{}/api/show", base_url))
            .json(&ModelRequest {
                model,
                stream: None,
            })
            .send()
            .await?;

        if show.status().is_success() {
            return Ok(());
        }
        if show.status() != reqwest::StatusCode::NOT_FOUND {
            return check_status(show, "Ollama").await.map(|_| ());
        }

        tracing::info!("Model {} not present on {}, pulling", model, base_url);
        let pull = self
            .http_client
            .post(format!("{}/api/pull", base_url))
            .json(&ModelRequest {
                model,
                stream: Some(false),
            })
            .send()
            .await?;
        let pull: PullResponse = check_status(pull, "Ollama").await?.json().await?;

        if pull.status != "success" {
            return Err(RagwayError::Llm(format!(
                "Pulling model {} ended with status {}",
                model, pull.status
            )));
        }
        tracing::info!("Model {} pulled", model);
        Ok(())
    }
}

#[async_trait]
impl LLMClient for OllamaClient {
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String> {
        #[derive(Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage>,
            stream: bool,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            message: ChatMessage,
        }

        self.chat_model_ready
            .get_or_try_init(|| self.ensure_model(&self.config.url, &self.config.model))
            .await?;

        let request = ChatRequest {
            model: &self.config.model,
            messages,
            stream: false,
        };

        let response = self
            .http_client
            .post(format!("{}/api/chat", self.config.url))
            .json(&request)
            .send()
            .await?;
        let chat: ChatResponse = check_status(response, "Ollama").await?.json().await?;
        Ok(chat.message.content)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        #[derive(Serialize)]
        struct EmbedRequest<'a> {
            model: &'a str,
            input: &'a [String],
        }

        #[derive(Deserialize)]
        struct EmbedResponse {
            embeddings: Vec<Vec<f32>>,
        }

        let base_url = self.config.embeddings_url();
        self.embedding_model_ready
            .get_or_try_init(|| self.ensure_model(base_url, &self.config.embedding_model))
            .await?;

        tracing::debug!("Embedding {} texts with {}", texts.len(), self.config.embedding_model);
        let response = self
            .http_client
            .post(format!("{}/api/embed", base_url))
            .json(&EmbedRequest {
                model: &self.config.embedding_model,
                input: texts,
            })
            .send()
            .await?;
        let embed: EmbedResponse = check_status(response, "Ollama").await?.json().await?;

        if embed.embeddings.len() != texts.len() {
            return Err(RagwayError::Llm(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                embed.embeddings.len()
            )));
        }
        Ok(embed.embeddings)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn embedding_model_name(&self) -> &str {
        &self.config.embedding_model
    }
}
