//! Prompt assembly and answer generation

use super::SearchResult;
use crate::llm::ChatModel;
use std::fmt::Write;
use std::sync::Arc;
use std::time::Duration;

/// Prefix of the answer text returned when the chat call fails
pub const GENERATION_FAILURE_PREFIX: &str = "Failed to generate AI response: ";

/// Build the grounded prompt for `query` from the retrieved documents
pub fn build_prompt(query: &str, documents: &[SearchResult]) -> String {
    let mut prompt = String::new();
    prompt.push_str(
        "Based on the following relevant documents, please answer the user's question.\n\n",
    );
    let _ = write!(prompt, "User Question: {}\n\n", query);
    prompt.push_str("Relevant Documents:\n");

    for (i, doc) in documents.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {} (by {})", i + 1, doc.title, doc.author);
        let _ = writeln!(prompt, "Category: {}", doc.category);
        let _ = writeln!(prompt, "Content: {}", doc.content);
        let _ = write!(prompt, "Similarity Score: {:?}\n\n", doc.similarity);
    }

    prompt.push_str(
        "Please provide a comprehensive answer based on the information from these documents. \
         If the documents don't contain enough information to answer the question, please say so.",
    );
    prompt
}

/// Turns retrieved documents into an answer. Never fails: chat errors and
/// timeouts become a failure message in the answer text.
#[derive(Clone)]
pub struct GenerationComposer {
    chat: Arc<dyn ChatModel>,
    timeout: Duration,
}

impl GenerationComposer {
    pub fn new(chat: Arc<dyn ChatModel>, timeout: Duration) -> Self {
        Self { chat, timeout }
    }

    pub async fn compose(&self, query: &str, documents: &[SearchResult]) -> String {
        let prompt = build_prompt(query, documents);
        tracing::debug!(
            "Generating answer with {} from {} documents",
            self.chat.model_name(),
            documents.len()
        );

        match tokio::time::timeout(self.timeout, self.chat.generate(&prompt)).await {
            Ok(Ok(answer)) => answer,
            Ok(Err(e)) => {
                tracing::error!("Error generating AI response: {}", e);
                format!("{}{}", GENERATION_FAILURE_PREFIX, e)
            }
            Err(_) => {
                tracing::error!("AI response timed out after {:?}", self.timeout);
                format!(
                    "{}timed out after {:?}",
                    GENERATION_FAILURE_PREFIX, self.timeout
                )
            }
        }
    }
}
