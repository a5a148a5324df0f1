//! Serve command: startup seeding followed by the MCP stdio server

use crate::app::ServeArgs;
use anyhow::Result;
use ragway_core::Gateway;
use std::sync::Arc;

pub async fn run(args: ServeArgs, gateway: Arc<Gateway>) -> Result<()> {
    if args.no_seed {
        gateway.provision().await;
    } else if let Some(report) = gateway.start().await {
        tracing::info!(
            "Seeded {} documents in {}ms",
            report.documents,
            report.elapsed_ms
        );
    }

    tracing::info!("Serving MCP on stdio ({} backend)", gateway.store().provider());
    ragway_mcp::start_server(gateway).await
}
