//! Data Transfer Objects - request/response types for the API.
//!
//! Field names in the post/study responses are the wire contract the public
//! pages (blog feed, study listings, sitemap) are built against.

use serde::{Deserialize, Serialize};

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// User information response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub created_at: String,
}

/// A base64-encoded file sent inline in a JSON body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilePayload {
    /// Base64-encoded bytes, without any data-URL prefix.
    pub data: String,
    pub name: String,
    pub content_type: String,
}

/// Request to create or update a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishPostRequest {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    /// "draft" or "published".
    pub status: String,
    /// Existing category name, or the "new_category" sentinel.
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_category: Option<String>,
    /// Required when creating; optional on update to keep the current image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<FilePayload>,
}

/// Request to create or update a study.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishStudyRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub author: String,
    pub publish_date: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    /// Required when creating; optional on update to keep the current PDF.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_file: Option<FilePayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_file: Option<FilePayload>,
}

/// Success result of a publish call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishResponse {
    pub success: bool,
    pub id: String,
    pub message: String,
}

/// A post as served to the public pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub status: String,
    pub categories: Vec<String>,
    pub featured_image_url: Option<String>,
    pub views_count: i32,
    pub likes_count: i32,
    pub created_at: String,
    pub updated_at: String,
}

/// A study as served to the public pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub author: String,
    pub publish_date: String,
    pub tags: Vec<String>,
    pub featured: bool,
    pub pdf_url: String,
    pub thumbnail_url: Option<String>,
    pub download_count: i32,
    pub created_at: String,
    pub updated_at: String,
}

/// A category entry for the admin form's dropdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub slug: String,
    pub name: String,
}

/// Contact form submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}
