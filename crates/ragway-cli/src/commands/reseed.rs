//! Reseed command

use crate::app::OutputFormat;
use anyhow::Result;
use ragway_core::{Gateway, RESEED_FAILURE_PREFIX, RESEED_SUCCESS};

pub async fn run(gateway: &Gateway, format: OutputFormat) -> Result<()> {
    let report = match gateway.reseed_report().await {
        Ok(report) => report,
        Err(e) => {
            println!("{}{}", RESEED_FAILURE_PREFIX, e);
            return Err(e.into());
        }
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Cli => {
            println!("{}", RESEED_SUCCESS);
            println!(
                "Loaded {} documents into {} in {}ms",
                report.documents,
                gateway.store().provider(),
                report.elapsed_ms
            );
        }
    }
    Ok(())
}
