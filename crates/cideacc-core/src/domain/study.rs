use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Study entity - a PDF document with metadata and an optional thumbnail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Study {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Single category value, unlike posts which carry an array.
    pub category: String,
    /// Free-text author credit, not an identity reference.
    pub author: String,
    pub publish_date: String,
    pub tags: Vec<String>,
    pub featured: bool,
    /// Durable reference to the PDF. Required.
    pub pdf_url: String,
    pub thumbnail_url: Option<String>,
    /// Incremented by the download read path, never by publishing.
    pub download_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Study {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        title: String,
        description: String,
        category: String,
        author: String,
        publish_date: String,
        tags: Vec<String>,
        featured: bool,
        pdf_url: String,
        thumbnail_url: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            category,
            author,
            publish_date,
            tags,
            featured,
            pdf_url,
            thumbnail_url,
            download_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
