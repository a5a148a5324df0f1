//! LLM integration
//!
//! Provides traits and implementations for:
//! - Embedding generation via external services (Ollama, vLLM, OpenAI, etc.)
//! - Chat completion for grounded answer generation

mod client;
mod http_chat;
mod http_embedder;
mod ollama;
mod traits;

pub use client::{create_client, ChatMessage, LLMClient, OpenAiClient};
pub use http_chat::HttpChatModel;
pub use http_embedder::HttpEmbedder;
pub use ollama::OllamaClient;
pub use traits::*;
