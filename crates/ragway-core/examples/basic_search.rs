// Basic search example using ragway as a library
//
// Needs an Ollama server on RAGWAY_LLM_URL (default http://localhost:11434).
// Set RAGWAY_VECTOR_STORE=memory to run without a vector database.

use ragway_core::{Config, Gateway, SearchRequest};

#[tokio::main]
async fn main() -> ragway_core::Result<()> {
    println!("Ragway Basic Search Example\n");

    let config = Config::load()?;
    let gateway = Gateway::from_config(config)?;

    let report = gateway.reseed_report().await?;
    println!(
        "Loaded {} documents into {} in {}ms\n",
        report.documents,
        gateway.store().provider(),
        report.elapsed_ms
    );

    for question in ["What is machine learning?", "How do qubits work?"] {
        let response = gateway.search(&SearchRequest::new(question, 3)).await?;
        println!("Q: {}", response.query);
        for doc in &response.similar_documents {
            println!("  {:.2}  {} ({})", doc.similarity, doc.title, doc.id);
        }
        println!("A: {}\n", response.ai_answer);
    }

    Ok(())
}
