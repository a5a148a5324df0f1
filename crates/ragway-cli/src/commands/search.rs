//! Search command

use crate::app::{OutputFormat, SearchArgs};
use crate::output::format_search_response;
use anyhow::Result;
use ragway_core::{Gateway, SearchRequest};

pub async fn run(args: SearchArgs, gateway: &Gateway, format: OutputFormat) -> Result<()> {
    let request = SearchRequest {
        query: args.query.join(" "),
        max_results: args.max_results,
    };

    let response = gateway.search(&request).await?;
    print!("{}", format_search_response(&response, format));
    Ok(())
}
