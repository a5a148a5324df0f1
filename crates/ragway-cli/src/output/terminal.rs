//! Terminal output formatter

use ragway_core::SearchResponse;

pub fn format_response(response: &SearchResponse) -> String {
    let mut output = String::new();

    output.push_str(response.ai_answer.trim_end());
    output.push_str("\n\n");

    if response.similar_documents.is_empty() {
        output.push_str("No similar documents\n");
    }
    for doc in &response.similar_documents {
        let score_pct = (doc.similarity * 100.0).round() as u32;
        output.push_str(&format!(
            "{:>3}% {} #{}\n     {} · {}\n",
            score_pct, doc.title, doc.id, doc.category, doc.author
        ));
    }

    output.push_str(&format!("\nRetrieved in {}ms\n", response.search_time_ms));
    output
}
