use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::slug::slugify;

/// Category entity - a lazily created taxonomy entry.
///
/// The slug doubles as the record identifier: at most one category exists per
/// slug. Categories are never updated or deleted by the publish workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Build a category from a display name; the slug is derived from it.
    pub fn new(name: String) -> Self {
        let slug = slugify(&name);
        Self {
            slug,
            name,
            created_at: Utc::now(),
        }
    }
}
