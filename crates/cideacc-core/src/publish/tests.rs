use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::*;
use crate::error::RepoError;
use crate::ports::{BaseRepository, StorageError, object_key};

#[derive(Default)]
struct MemPosts {
    items: Mutex<HashMap<Uuid, Post>>,
    fail_saves: AtomicBool,
}

#[async_trait]
impl BaseRepository<Post, Uuid> for MemPosts {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.items.lock().unwrap().get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(RepoError::Query("simulated store failure".to_string()));
        }
        self.items.lock().unwrap().insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.items
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for MemPosts {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.slug == slug)
            .max_by_key(|p| p.created_at)
            .cloned())
    }

    async fn list_published(&self, limit: u64) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.status == PostStatus::Published)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts.truncate(limit as usize);
        Ok(posts)
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct MemStudies {
    items: Mutex<HashMap<Uuid, Study>>,
    fail_saves: AtomicBool,
}

#[async_trait]
impl BaseRepository<Study, Uuid> for MemStudies {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Study>, RepoError> {
        Ok(self.items.lock().unwrap().get(&id).cloned())
    }

    async fn save(&self, study: Study) -> Result<Study, RepoError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(RepoError::Query("simulated store failure".to_string()));
        }
        self.items.lock().unwrap().insert(study.id, study.clone());
        Ok(study)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.items
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl StudyRepository for MemStudies {
    async fn list_featured(&self, limit: u64) -> Result<Vec<Study>, RepoError> {
        let mut studies: Vec<Study> = self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.featured)
            .cloned()
            .collect();
        studies.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        studies.truncate(limit as usize);
        Ok(studies)
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<Study>, RepoError> {
        let mut studies: Vec<Study> = self.items.lock().unwrap().values().cloned().collect();
        studies.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        studies.truncate(limit as usize);
        Ok(studies)
    }

    async fn increment_downloads(&self, id: Uuid) -> Result<(), RepoError> {
        let mut items = self.items.lock().unwrap();
        let study = items.get_mut(&id).ok_or(RepoError::NotFound)?;
        study.download_count += 1;
        Ok(())
    }
}

#[derive(Default)]
struct MemCategories {
    items: Mutex<HashMap<String, Category>>,
}

#[async_trait]
impl CategoryRepository for MemCategories {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        Ok(self.items.lock().unwrap().get(slug).cloned())
    }

    async fn create_if_absent(&self, category: Category) -> Result<(), RepoError> {
        self.items
            .lock()
            .unwrap()
            .entry(category.slug.clone())
            .or_insert(category);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        Ok(self.items.lock().unwrap().values().cloned().collect())
    }
}

#[derive(Default)]
struct MemAssets {
    objects: Mutex<HashSet<String>>,
    fail_uploads: AtomicBool,
}

#[async_trait]
impl AssetStore for MemAssets {
    async fn upload(
        &self,
        file: &AssetUpload,
        namespace: &str,
        progress: Option<&ProgressFn>,
    ) -> Result<String, StorageError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::Upload(
                "simulated transport failure".to_string(),
            ));
        }
        let url = format!("mem://{}", object_key(namespace, &file.file_name));
        self.objects.lock().unwrap().insert(url.clone());
        if let Some(callback) = progress {
            callback(100);
        }
        Ok(url)
    }

    async fn remove(&self, url: &str) -> Result<(), StorageError> {
        // Absent assets delete silently.
        self.objects.lock().unwrap().remove(url);
        Ok(())
    }
}

struct Harness {
    publisher: Publisher,
    posts: std::sync::Arc<MemPosts>,
    studies: std::sync::Arc<MemStudies>,
    categories: std::sync::Arc<MemCategories>,
    assets: std::sync::Arc<MemAssets>,
}

fn harness() -> Harness {
    let posts = Arc::new(MemPosts::default());
    let studies = Arc::new(MemStudies::default());
    let categories = Arc::new(MemCategories::default());
    let assets = Arc::new(MemAssets::default());
    let publisher = Publisher::new(
        posts.clone(),
        studies.clone(),
        categories.clone(),
        assets.clone(),
    );
    Harness {
        publisher,
        posts,
        studies,
        categories,
        assets,
    }
}

fn post_input() -> PostInput {
    PostInput {
        title: "Avances en IA".to_string(),
        excerpt: "Un resumen breve del artículo.".to_string(),
        content: "Contenido completo con más de veinte caracteres.".to_string(),
        status: PostStatus::Draft,
        category: "Investigación".to_string(),
        new_category: None,
    }
}

fn study_input() -> StudyInput {
    StudyInput {
        title: "Impacto educativo".to_string(),
        description: "Estudio sobre el impacto de la IA en la educación.".to_string(),
        category: "education".to_string(),
        author: "Equipo CIDEACC".to_string(),
        publish_date: "2025-03-01".to_string(),
        tags: vec!["ia".to_string(), "educación".to_string()],
        featured: true,
    }
}

fn image() -> AssetUpload {
    AssetUpload {
        bytes: vec![0x89, 0x50, 0x4e, 0x47],
        file_name: "cover.png".to_string(),
        content_type: "image/png".to_string(),
    }
}

fn pdf() -> AssetUpload {
    AssetUpload {
        bytes: vec![0x25, 0x50, 0x44, 0x46],
        file_name: "study.pdf".to_string(),
        content_type: "application/pdf".to_string(),
    }
}

#[tokio::test]
async fn create_post_end_to_end() {
    let h = harness();
    let actor = Uuid::new_v4();

    let outcome = h
        .publisher
        .publish_post(actor, post_input(), Some(image()), None, None)
        .await
        .unwrap();
    assert!(!outcome.message.is_empty());

    let post = h.posts.find_by_id(outcome.id).await.unwrap().unwrap();
    assert_eq!(post.slug, "avances-en-ia");
    assert_eq!(post.categories, vec!["Investigación".to_string()]);
    assert_eq!(post.author_id, actor);
    assert_eq!(post.views_count, 0);
    assert_eq!(post.likes_count, 0);
    assert!(post.featured_image_url.is_some());
    assert_eq!(h.assets.objects.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn create_post_requires_featured_image() {
    let h = harness();

    let err = h
        .publisher
        .publish_post(Uuid::new_v4(), post_input(), None, None, None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PublishError::InvalidArgument {
            field: "featured_image",
            ..
        }
    ));
    assert!(h.posts.items.lock().unwrap().is_empty());
    assert!(h.assets.objects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn validation_rejects_bad_lengths() {
    let h = harness();
    let actor = Uuid::new_v4();

    let mut short_title = post_input();
    short_title.title = "a".to_string();
    let err = h
        .publisher
        .publish_post(actor, short_title, Some(image()), None, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PublishError::InvalidArgument { field: "title", .. }
    ));

    let mut short_excerpt = post_input();
    short_excerpt.excerpt = "corto".to_string();
    let err = h
        .publisher
        .publish_post(actor, short_excerpt, Some(image()), None, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PublishError::InvalidArgument {
            field: "excerpt",
            ..
        }
    ));

    let mut short_content = post_input();
    short_content.content = "breve".to_string();
    let err = h
        .publisher
        .publish_post(actor, short_content, Some(image()), None, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PublishError::InvalidArgument {
            field: "content",
            ..
        }
    ));

    // Validation fails before any upload happens.
    assert!(h.assets.objects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn rollback_deletes_upload_when_write_fails() {
    let h = harness();
    h.posts.fail_saves.store(true, Ordering::SeqCst);

    let err = h
        .publisher
        .publish_post(Uuid::new_v4(), post_input(), Some(image()), None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, PublishError::Internal(_)));
    assert!(h.posts.items.lock().unwrap().is_empty());
    // The asset uploaded during the failed call must not be orphaned.
    assert!(h.assets.objects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn update_rejects_foreign_author() {
    let h = harness();
    let author = Uuid::new_v4();
    let intruder = Uuid::new_v4();

    let outcome = h
        .publisher
        .publish_post(author, post_input(), Some(image()), None, None)
        .await
        .unwrap();

    let mut changed = post_input();
    changed.title = "Título manipulado".to_string();
    let err = h
        .publisher
        .publish_post(intruder, changed, None, Some(outcome.id), None)
        .await
        .unwrap_err();

    assert!(matches!(err, PublishError::PermissionDenied));
    let post = h.posts.find_by_id(outcome.id).await.unwrap().unwrap();
    assert_eq!(post.title, "Avances en IA");
}

#[tokio::test]
async fn update_missing_post_is_not_found() {
    let h = harness();

    let err = h
        .publisher
        .publish_post(
            Uuid::new_v4(),
            post_input(),
            None,
            Some(Uuid::new_v4()),
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, PublishError::NotFound));
}

#[tokio::test]
async fn update_preserves_identity_fields() {
    let h = harness();
    let actor = Uuid::new_v4();

    let outcome = h
        .publisher
        .publish_post(actor, post_input(), Some(image()), None, None)
        .await
        .unwrap();
    let before = h.posts.find_by_id(outcome.id).await.unwrap().unwrap();

    let mut changed = post_input();
    changed.title = "Nuevos avances en IA".to_string();
    changed.status = PostStatus::Published;
    h.publisher
        .publish_post(actor, changed, None, Some(outcome.id), None)
        .await
        .unwrap();

    let after = h.posts.find_by_id(outcome.id).await.unwrap().unwrap();
    assert_eq!(after.author_id, before.author_id);
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at >= before.updated_at);
    assert_eq!(after.slug, "nuevos-avances-en-ia");
    assert_eq!(after.status, PostStatus::Published);
    // The image was not replaced, so the original reference survives.
    assert_eq!(after.featured_image_url, before.featured_image_url);
}

#[tokio::test]
async fn update_with_new_image_replaces_old_asset() {
    let h = harness();
    let actor = Uuid::new_v4();

    let outcome = h
        .publisher
        .publish_post(actor, post_input(), Some(image()), None, None)
        .await
        .unwrap();
    let old_url = h
        .posts
        .find_by_id(outcome.id)
        .await
        .unwrap()
        .unwrap()
        .featured_image_url
        .unwrap();

    let mut replacement = image();
    replacement.file_name = "cover-v2.png".to_string();
    h.publisher
        .publish_post(actor, post_input(), Some(replacement), Some(outcome.id), None)
        .await
        .unwrap();

    let objects = h.assets.objects.lock().unwrap();
    assert_eq!(objects.len(), 1);
    assert!(!objects.contains(&old_url));
}

#[tokio::test]
async fn resolve_category_passthrough_has_no_side_effect() {
    let h = harness();

    let name = h
        .publisher
        .resolve_category("Investigación", None)
        .await
        .unwrap();

    assert_eq!(name, "Investigación");
    assert!(h.categories.items.lock().unwrap().is_empty());
}

#[tokio::test]
async fn resolve_category_is_idempotent() {
    let h = harness();

    let first = h
        .publisher
        .resolve_category(NEW_CATEGORY_SENTINEL, Some("  Ética en IA  "))
        .await
        .unwrap();
    assert_eq!(first, "Ética en IA");

    // Same slug again, different casing: no second record, original name kept.
    h.publisher
        .resolve_category(NEW_CATEGORY_SENTINEL, Some("ética en ia"))
        .await
        .unwrap();

    let categories = h.categories.items.lock().unwrap();
    assert_eq!(categories.len(), 1);
    let stored = categories.get("tica-en-ia").unwrap();
    assert_eq!(stored.name, "Ética en IA");
}

#[tokio::test]
async fn resolve_category_rejects_short_names() {
    let h = harness();

    for bad in [None, Some(""), Some(" x ")] {
        let err = h
            .publisher
            .resolve_category(NEW_CATEGORY_SENTINEL, bad)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PublishError::InvalidArgument {
                field: "new_category",
                ..
            }
        ));
    }
    assert!(h.categories.items.lock().unwrap().is_empty());
}

#[tokio::test]
async fn upload_progress_is_monotonic() {
    let h = harness();
    let seen = std::sync::Arc::new(Mutex::new(Vec::new()));
    let seen_in_callback = std::sync::Arc::clone(&seen);
    let callback = move |pct: u8| seen_in_callback.lock().unwrap().push(pct);

    h.publisher
        .publish_post(
            Uuid::new_v4(),
            post_input(),
            Some(image()),
            None,
            Some(&callback),
        )
        .await
        .unwrap();

    drop(callback);
    let seen = std::sync::Arc::try_unwrap(seen).unwrap().into_inner().unwrap();
    assert!(!seen.is_empty());
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(*seen.last().unwrap(), 100);
}

#[tokio::test]
async fn delete_post_removes_record_and_asset() {
    let h = harness();
    let actor = Uuid::new_v4();

    let outcome = h
        .publisher
        .publish_post(actor, post_input(), Some(image()), None, None)
        .await
        .unwrap();

    let err = h
        .publisher
        .delete_post(Uuid::new_v4(), outcome.id)
        .await
        .unwrap_err();
    assert!(matches!(err, PublishError::PermissionDenied));

    h.publisher.delete_post(actor, outcome.id).await.unwrap();
    assert!(h.posts.items.lock().unwrap().is_empty());
    assert!(h.assets.objects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn create_study_requires_pdf() {
    let h = harness();

    let err = h
        .publisher
        .publish_study(study_input(), None, None, None, None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PublishError::InvalidArgument { field: "pdf", .. }
    ));
    assert!(h.studies.items.lock().unwrap().is_empty());
}

#[tokio::test]
async fn create_study_end_to_end() {
    let h = harness();

    let mut thumbnail = image();
    thumbnail.file_name = "thumb.png".to_string();
    let outcome = h
        .publisher
        .publish_study(study_input(), Some(pdf()), Some(thumbnail), None, None)
        .await
        .unwrap();

    let study = h.studies.find_by_id(outcome.id).await.unwrap().unwrap();
    assert!(study.pdf_url.contains("studies/pdfs/"));
    assert!(study.thumbnail_url.unwrap().contains("studies/thumbnails/"));
    assert_eq!(study.download_count, 0);
    assert_eq!(h.assets.objects.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn study_rollback_deletes_every_fresh_upload() {
    let h = harness();
    h.studies.fail_saves.store(true, Ordering::SeqCst);

    let mut thumbnail = image();
    thumbnail.file_name = "thumb.png".to_string();
    let err = h
        .publisher
        .publish_study(study_input(), Some(pdf()), Some(thumbnail), None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, PublishError::Internal(_)));
    assert!(h.studies.items.lock().unwrap().is_empty());
    assert!(h.assets.objects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failed_upload_aborts_before_record_write() {
    let h = harness();
    h.assets.fail_uploads.store(true, Ordering::SeqCst);

    let err = h
        .publisher
        .publish_post(Uuid::new_v4(), post_input(), Some(image()), None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, PublishError::Internal(_)));
    assert!(h.posts.items.lock().unwrap().is_empty());
}

#[tokio::test]
async fn delete_study_removes_assets_and_record() {
    let h = harness();

    let outcome = h
        .publisher
        .publish_study(study_input(), Some(pdf()), Some(image()), None, None)
        .await
        .unwrap();

    h.publisher.delete_study(outcome.id).await.unwrap();
    assert!(h.studies.items.lock().unwrap().is_empty());
    assert!(h.assets.objects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn increment_downloads_counts_up() {
    let h = harness();

    let outcome = h
        .publisher
        .publish_study(study_input(), Some(pdf()), None, None, None)
        .await
        .unwrap();

    h.studies.increment_downloads(outcome.id).await.unwrap();
    h.studies.increment_downloads(outcome.id).await.unwrap();
    let study = h.studies.find_by_id(outcome.id).await.unwrap().unwrap();
    assert_eq!(study.download_count, 2);
}
