//! Output formatters

pub mod json;
pub mod terminal;

use crate::app::OutputFormat;
use ragway_core::SearchResponse;

/// Format a search response
pub fn format_search_response(response: &SearchResponse, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_response(response),
        OutputFormat::Cli => terminal::format_response(response),
    }
}
