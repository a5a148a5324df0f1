//! Indexable documents and their payload representation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata stored next to a vector; timestamps are RFC 3339 strings
pub type Payload = BTreeMap<String, String>;

/// Payload keys shared by every backend driver
pub mod keys {
    pub const DOC_ID: &str = "doc_id";
    pub const TITLE: &str = "title";
    pub const CONTENT: &str = "content";
    pub const CATEGORY: &str = "category";
    pub const AUTHOR: &str = "author";
    pub const TAGS: &str = "tags";
    pub const CREATED_AT: &str = "createdAt";
}

/// A unit of indexable content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    /// The text that gets embedded
    pub content: String,
    pub category: String,
    pub author: String,
    /// Free-form, comma separated
    pub tags: String,
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Create a document stamped with the current time
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
        author: impl Into<String>,
        tags: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            category: category.into(),
            author: author.into(),
            tags: tags.into(),
            created_at: Utc::now(),
        }
    }

    /// Metadata attached to the stored point, including the content itself
    pub fn payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.insert(keys::DOC_ID.to_string(), self.id.clone());
        payload.insert(keys::TITLE.to_string(), self.title.clone());
        payload.insert(keys::CONTENT.to_string(), self.content.clone());
        payload.insert(keys::CATEGORY.to_string(), self.category.clone());
        payload.insert(keys::AUTHOR.to_string(), self.author.clone());
        payload.insert(keys::TAGS.to_string(), self.tags.clone());
        payload.insert(keys::CREATED_AT.to_string(), self.created_at.to_rfc3339());
        payload
    }
}
