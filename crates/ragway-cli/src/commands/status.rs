//! Status command

use crate::app::OutputFormat;
use anyhow::Result;
use ragway_core::Gateway;

pub async fn run(gateway: &Gateway, format: OutputFormat) -> Result<()> {
    let status = gateway.status().await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        OutputFormat::Cli => {
            println!("Backend:         {}", status.provider);
            println!("Collection:      {}", status.collection);
            println!("Dimensions:      {}", status.dimensions);
            println!("Documents:       {}", status.documents);
            println!();
            println!("Models:");
            println!("  Embedding:     {}", status.embedding_model);
            println!("  Chat:          {}", status.chat_model);
        }
    }
    Ok(())
}
