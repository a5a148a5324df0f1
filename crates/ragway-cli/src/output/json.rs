//! JSON output formatter

use ragway_core::SearchResponse;

pub fn format_response(response: &SearchResponse) -> String {
    serde_json::to_string_pretty(response).unwrap_or_else(|_| "{}".to_string()) + "\n"
}
