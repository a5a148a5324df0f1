//! HTTP-based chat model using external LLM service

use super::{ChatMessage, ChatModel, LLMClient};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Chat model that sends a single user turn to an external service
pub struct HttpChatModel {
    client: Arc<dyn LLMClient>,
}

impl HttpChatModel {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChatModel for HttpChatModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.client
            .chat_completion(vec![ChatMessage::user(prompt)])
            .await
    }

    fn model_name(&self) -> &str {
        self.client.model_name()
    }
}
