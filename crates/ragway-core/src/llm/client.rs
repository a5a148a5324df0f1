//! HTTP clients for external LLM services (Ollama, vLLM, OpenAI, etc.)

use crate::config::{LLMServiceConfig, LlmProvider};
use crate::error::{RagwayError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Trait for LLM service clients
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate chat completion
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String>;

    /// Generate embeddings for multiple texts
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Generate embeddings for text
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RagwayError::Llm("No embedding returned".to_string()))
    }

    /// Get chat model name
    fn model_name(&self) -> &str;

    /// Get embedding model name
    fn embedding_model_name(&self) -> &str;
}

/// Chat message for completion requests
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Build the client matching the configured provider
pub fn create_client(config: LLMServiceConfig) -> Result<Arc<dyn LLMClient>> {
    let client: Arc<dyn LLMClient> = match config.provider {
        LlmProvider::Ollama => Arc::new(super::OllamaClient::new(config)?),
        LlmProvider::OpenAi => Arc::new(OpenAiClient::new(config)?),
    };
    Ok(client)
}

pub(crate) fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(RagwayError::Http)
}

/// Turn a non-2xx response into an `ExternalError` carrying the body
pub(crate) async fn check_status(
    response: reqwest::Response,
    service: &str,
) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(RagwayError::ExternalError(format!(
        "{} error (HTTP {}): {}",
        service, status, body
    )))
}

/// vLLM/OpenAI-compatible client
pub struct OpenAiClient {
    http_client: reqwest::Client,
    config: LLMServiceConfig,
}

impl OpenAiClient {
    /// Create new client from configuration
    pub fn new(config: LLMServiceConfig) -> Result<Self> {
        let http_client = build_http_client(config.timeout_secs)?;
        Ok(Self {
            http_client,
            config,
        })
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.api_key {
            Some(ref api_key) => req.header("Authorization", format!("Bearer {}", api_key)),
            None => req,
        }
    }
}

#[async_trait]
impl LLMClient for OpenAiClient {
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String> {
        #[derive(Serialize)]
        struct ChatRequest {
            model: String,
            messages: Vec<ChatMessage>,
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<ChatChoice>,
        }

        #[derive(Deserialize)]
        struct ChatChoice {
            message: ChatMessage,
        }

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages,
            temperature: 0.7,
        };

        let url = format!("{}/v1/chat/completions", self.config.url);
        let response = self
            .authorize(self.http_client.post(&url).json(&request))
            .send()
            .await?;
        let response = check_status(response, "LLM service").await?;
        let chat_response: ChatResponse = response.json().await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| RagwayError::Llm("No response from LLM".to_string()))
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
            data: Vec<EmbedData>,
        }

        #[derive(Deserialize)]
        struct EmbedData {
            embedding: Vec<f32>,
        }

        let request = EmbedRequest {
            model: &self.config.embedding_model,
            input: texts,
        };

        let url = format!("{}/v1/embeddings", self.config.embeddings_url());
        tracing::debug!("Embedding {} texts via {}", texts.len(), url);

        let response = self
            .authorize(self.http_client.post(&url).json(&request))
            .send()
            .await?;
        let response = check_status(response, "Embedding service").await?;
        let embed_response: EmbedResponse = response.json().await?;

        if embed_response.data.len() != texts.len() {
            return Err(RagwayError::Llm(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                embed_response.data.len()
            )));
        }

        Ok(embed_response
            .data
            .into_iter()
            .map(|d| d.embedding)
            .collect())
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn embedding_model_name(&self) -> &str {
        &self.config.embedding_model
    }
}
