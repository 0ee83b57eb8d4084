use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::slug::slugify;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }

    /// Parse the wire representation; anything else is rejected at the boundary.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(PostStatus::Draft),
            "published" => Some(PostStatus::Published),
            _ => None,
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Post entity - a blog article with one featured image asset.
///
/// Field names are the wire contract the listing pages and sitemap depend on;
/// renaming any of them is a breaking change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    /// Identity that created the post. Set once, never altered on update.
    pub author_id: Uuid,
    pub title: String,
    /// Derived from `title`; not guaranteed unique across posts.
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub status: PostStatus,
    /// Always exactly one element when written through the publish workflow.
    pub categories: Vec<String>,
    /// Durable reference to the featured image. Required at creation.
    pub featured_image_url: Option<String>,
    pub views_count: i32,
    pub likes_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with counters zeroed and the slug derived from the title.
    pub fn new(
        author_id: Uuid,
        title: String,
        excerpt: String,
        content: String,
        status: PostStatus,
        category: String,
        featured_image_url: String,
    ) -> Self {
        let now = Utc::now();
        let slug = slugify(&title);
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            slug,
            excerpt,
            content,
            status,
            categories: vec![category],
            featured_image_url: Some(featured_image_url),
            views_count: 0,
            likes_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
