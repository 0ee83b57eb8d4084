//! Publish workflow - the multi-step, multi-resource mutation behind the
//! admin's "save post" and "save study" buttons.
//!
//! A publish call validates input, lazily materializes the category, uploads
//! binary assets to object storage and writes the structured record. Asset
//! storage and the record store cannot commit atomically together, so the
//! orchestrator substitutes a compensating delete: any asset uploaded during
//! a call that fails afterwards is removed again, and a record is never
//! written pointing at an asset that was not stored.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Category, Post, PostStatus, Study};
use crate::error::PublishError;
use crate::ports::{
    AssetStore, AssetUpload, CategoryRepository, PostRepository, ProgressFn, StudyRepository,
    namespaces,
};
use crate::slug::slugify;

/// Reserved `category` value signaling "create the category named in
/// `new_category`" rather than naming an existing one.
pub const NEW_CATEGORY_SENTINEL: &str = "new_category";

/// Validated form fields for a post.
#[derive(Debug, Clone)]
pub struct PostInput {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub status: PostStatus,
    pub category: String,
    pub new_category: Option<String>,
}

/// Validated form fields for a study.
#[derive(Debug, Clone)]
pub struct StudyInput {
    pub title: String,
    pub description: String,
    pub category: String,
    pub author: String,
    pub publish_date: String,
    pub tags: Vec<String>,
    pub featured: bool,
}

/// Success result of a publish call.
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    pub id: Uuid,
    pub message: String,
}

/// Coordinates validation, category resolution, asset upload, record write
/// and failure rollback. All collaborators are injected so tests can
/// substitute fakes.
pub struct Publisher {
    posts: Arc<dyn PostRepository>,
    studies: Arc<dyn StudyRepository>,
    categories: Arc<dyn CategoryRepository>,
    assets: Arc<dyn AssetStore>,
}

impl Publisher {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        studies: Arc<dyn StudyRepository>,
        categories: Arc<dyn CategoryRepository>,
        assets: Arc<dyn AssetStore>,
    ) -> Self {
        Self {
            posts,
            studies,
            categories,
            assets,
        }
    }

    /// Ensure a taxonomy entry exists for the selected category and return the
    /// final category name to store.
    ///
    /// Anything other than the sentinel passes through untouched. For the
    /// sentinel, the new name is trimmed, validated and upserted keyed by its
    /// slug; an existing record keeps its original casing and spelling.
    pub async fn resolve_category(
        &self,
        selected: &str,
        new_category: Option<&str>,
    ) -> Result<String, PublishError> {
        if selected != NEW_CATEGORY_SENTINEL {
            return Ok(selected.to_string());
        }

        let name = new_category.map(str::trim).unwrap_or_default();
        if name.chars().count() < 2 {
            return Err(PublishError::invalid(
                "new_category",
                "the new category name must be at least 2 characters",
            ));
        }

        let category = Category::new(name.to_string());
        if self.categories.find_by_slug(&category.slug).await?.is_none() {
            self.categories.create_if_absent(category).await?;
        }

        Ok(name.to_string())
    }

    /// Create or update a post.
    ///
    /// `existing_id` switches create to update. A new post requires an image;
    /// an update may omit it to keep the current one. The acting user must be
    /// the author of the post being updated.
    pub async fn publish_post(
        &self,
        actor: Uuid,
        input: PostInput,
        image: Option<AssetUpload>,
        existing_id: Option<Uuid>,
        progress: Option<&ProgressFn>,
    ) -> Result<PublishOutcome, PublishError> {
        validate_post_input(&input)?;

        // Checked before any side effect so a doomed create never uploads.
        if existing_id.is_none() && image.is_none() {
            return Err(PublishError::invalid(
                "featured_image",
                "a featured image is required for a new post",
            ));
        }

        let category = self
            .resolve_category(&input.category, input.new_category.as_deref())
            .await?;

        let existing = match existing_id {
            Some(id) => {
                let post = self
                    .posts
                    .find_by_id(id)
                    .await?
                    .ok_or(PublishError::NotFound)?;
                if post.author_id != actor {
                    return Err(PublishError::PermissionDenied);
                }
                Some(post)
            }
            None => None,
        };

        let mut uploaded: Option<String> = None;
        if let Some(file) = &image {
            if let Some(old) = existing
                .as_ref()
                .and_then(|p| p.featured_image_url.as_deref())
            {
                self.best_effort_remove(old, "superseded post image").await;
            }

            let url = self
                .assets
                .upload(file, namespaces::POST_IMAGES, progress)
                .await
                .map_err(|e| PublishError::Internal(format!("image upload failed: {e}")))?;
            uploaded = Some(url);
        }

        let write = match existing {
            Some(mut post) => {
                post.title = input.title;
                post.slug = slugify(&post.title);
                post.excerpt = input.excerpt;
                post.content = input.content;
                post.status = input.status;
                post.categories = vec![category];
                if let Some(url) = &uploaded {
                    post.featured_image_url = Some(url.clone());
                }
                post.updated_at = Utc::now();
                self.posts.save(post).await.map(|p| (p.id, "Post updated"))
            }
            None => match uploaded.clone() {
                Some(image_url) => {
                    let post = Post::new(
                        actor,
                        input.title,
                        input.excerpt,
                        input.content,
                        input.status,
                        category,
                        image_url,
                    );
                    self.posts.save(post).await.map(|p| (p.id, "Post created"))
                }
                // Unreachable given the early check; the final guard on the
                // no-dangling-asset invariant.
                None => Err(crate::error::RepoError::Constraint(
                    "new post without image".to_string(),
                )),
            },
        };

        match write {
            Ok((id, message)) => Ok(PublishOutcome {
                id,
                message: message.to_string(),
            }),
            Err(err) => {
                if let Some(url) = &uploaded {
                    self.best_effort_remove(url, "rollback of fresh upload")
                        .await;
                }
                Err(err.into())
            }
        }
    }

    /// Create or update a study. Same pipeline as posts, with two asset slots:
    /// the PDF (required on create) and an optional thumbnail.
    pub async fn publish_study(
        &self,
        input: StudyInput,
        pdf: Option<AssetUpload>,
        thumbnail: Option<AssetUpload>,
        existing_id: Option<Uuid>,
        progress: Option<&ProgressFn>,
    ) -> Result<PublishOutcome, PublishError> {
        validate_study_input(&input)?;

        if existing_id.is_none() && pdf.is_none() {
            return Err(PublishError::invalid(
                "pdf",
                "a PDF document is required for a new study",
            ));
        }

        let existing = match existing_id {
            Some(id) => Some(
                self.studies
                    .find_by_id(id)
                    .await?
                    .ok_or(PublishError::NotFound)?,
            ),
            None => None,
        };

        let mut pdf_url = existing.as_ref().map(|s| s.pdf_url.clone());
        let mut thumbnail_url = existing.as_ref().and_then(|s| s.thumbnail_url.clone());

        // URLs uploaded during this call; these get deleted again if any
        // later step fails.
        let mut fresh: Vec<String> = Vec::new();

        if let Some(file) = &pdf {
            if let Some(old) = &pdf_url {
                self.best_effort_remove(old, "superseded study PDF").await;
            }
            match self
                .assets
                .upload(file, namespaces::STUDY_PDFS, progress)
                .await
            {
                Ok(url) => {
                    fresh.push(url.clone());
                    pdf_url = Some(url);
                }
                Err(e) => {
                    return Err(PublishError::Internal(format!("pdf upload failed: {e}")));
                }
            }
        }

        if let Some(file) = &thumbnail {
            if let Some(old) = &thumbnail_url {
                self.best_effort_remove(old, "superseded study thumbnail")
                    .await;
            }
            match self
                .assets
                .upload(file, namespaces::STUDY_THUMBNAILS, progress)
                .await
            {
                Ok(url) => {
                    fresh.push(url.clone());
                    thumbnail_url = Some(url);
                }
                Err(e) => {
                    self.rollback_uploads(&fresh).await;
                    return Err(PublishError::Internal(format!(
                        "thumbnail upload failed: {e}"
                    )));
                }
            }
        }

        let write = match existing {
            Some(mut study) => {
                study.title = input.title;
                study.description = input.description;
                study.category = input.category;
                study.author = input.author;
                study.publish_date = input.publish_date;
                study.tags = input.tags;
                study.featured = input.featured;
                if let Some(url) = &pdf_url {
                    study.pdf_url = url.clone();
                }
                study.thumbnail_url = thumbnail_url.clone();
                study.updated_at = Utc::now();
                self.studies
                    .save(study)
                    .await
                    .map(|s| (s.id, "Study updated"))
            }
            None => match pdf_url.clone() {
                Some(url) => {
                    let study = Study::new(
                        input.title,
                        input.description,
                        input.category,
                        input.author,
                        input.publish_date,
                        input.tags,
                        input.featured,
                        url,
                        thumbnail_url.clone(),
                    );
                    self.studies
                        .save(study)
                        .await
                        .map(|s| (s.id, "Study created"))
                }
                None => Err(crate::error::RepoError::Constraint(
                    "new study without pdf".to_string(),
                )),
            },
        };

        match write {
            Ok((id, message)) => Ok(PublishOutcome {
                id,
                message: message.to_string(),
            }),
            Err(err) => {
                self.rollback_uploads(&fresh).await;
                Err(err.into())
            }
        }
    }

    /// Delete a post and its featured image. Only the author may delete.
    pub async fn delete_post(&self, actor: Uuid, id: Uuid) -> Result<(), PublishError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(PublishError::NotFound)?;
        if post.author_id != actor {
            return Err(PublishError::PermissionDenied);
        }

        if let Some(url) = &post.featured_image_url {
            self.best_effort_remove(url, "image of deleted post").await;
        }
        self.posts.delete(id).await?;
        Ok(())
    }

    /// Delete a study together with its PDF and thumbnail.
    pub async fn delete_study(&self, id: Uuid) -> Result<(), PublishError> {
        let study = self
            .studies
            .find_by_id(id)
            .await?
            .ok_or(PublishError::NotFound)?;

        self.best_effort_remove(&study.pdf_url, "PDF of deleted study")
            .await;
        if let Some(url) = &study.thumbnail_url {
            self.best_effort_remove(url, "thumbnail of deleted study")
                .await;
        }
        self.studies.delete(id).await?;
        Ok(())
    }

    /// Cleanup deletes never fail the enclosing operation; the failure is
    /// logged and the asset is left for a reconciliation sweep.
    async fn best_effort_remove(&self, url: &str, context: &str) {
        if let Err(err) = self.assets.remove(url).await {
            tracing::warn!(%url, error = %err, "could not delete {context}");
        }
    }

    async fn rollback_uploads(&self, urls: &[String]) {
        for url in urls {
            self.best_effort_remove(url, "rollback of fresh upload").await;
        }
    }
}

fn validate_post_input(input: &PostInput) -> Result<(), PublishError> {
    let title_len = input.title.chars().count();
    if !(2..=150).contains(&title_len) {
        return Err(PublishError::invalid(
            "title",
            "must be between 2 and 150 characters",
        ));
    }

    let excerpt_len = input.excerpt.chars().count();
    if !(10..=300).contains(&excerpt_len) {
        return Err(PublishError::invalid(
            "excerpt",
            "must be between 10 and 300 characters",
        ));
    }

    if input.content.chars().count() < 20 {
        return Err(PublishError::invalid(
            "content",
            "must be at least 20 characters",
        ));
    }

    if input.category.is_empty() {
        return Err(PublishError::invalid("category", "is required"));
    }

    Ok(())
}

fn validate_study_input(input: &StudyInput) -> Result<(), PublishError> {
    let title_len = input.title.chars().count();
    if !(2..=150).contains(&title_len) {
        return Err(PublishError::invalid(
            "title",
            "must be between 2 and 150 characters",
        ));
    }

    if input.description.chars().count() < 10 {
        return Err(PublishError::invalid(
            "description",
            "must be at least 10 characters",
        ));
    }

    if input.category.is_empty() {
        return Err(PublishError::invalid("category", "is required"));
    }

    if input.author.trim().is_empty() {
        return Err(PublishError::invalid("author", "is required"));
    }

    Ok(())
}

#[cfg(test)]
mod tests;
