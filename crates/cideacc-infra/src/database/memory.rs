//! In-memory repositories - used as fallback when the database is not
//! configured. Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use cideacc_core::domain::{Category, Post, PostStatus, Study, User};
use cideacc_core::error::RepoError;
use cideacc_core::ports::{
    BaseRepository, CategoryRepository, PostRepository, StudyRepository, UserRepository,
};

/// In-memory post repository backed by a HashMap with an async RwLock.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        self.store.write().await.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        Ok(self
            .store
            .read()
            .await
            .values()
            .filter(|p| p.slug == slug)
            .max_by_key(|p| p.created_at)
            .cloned())
    }

    async fn list_published(&self, limit: u64) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self
            .store
            .read()
            .await
            .values()
            .filter(|p| p.status == PostStatus::Published)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts.truncate(limit as usize);
        Ok(posts)
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self
            .store
            .read()
            .await
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }
}

/// In-memory study repository.
#[derive(Default)]
pub struct InMemoryStudyRepository {
    store: RwLock<HashMap<Uuid, Study>>,
}

impl InMemoryStudyRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Study, Uuid> for InMemoryStudyRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Study>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, study: Study) -> Result<Study, RepoError> {
        self.store.write().await.insert(study.id, study.clone());
        Ok(study)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl StudyRepository for InMemoryStudyRepository {
    async fn list_featured(&self, limit: u64) -> Result<Vec<Study>, RepoError> {
        let mut studies: Vec<Study> = self
            .store
            .read()
            .await
            .values()
            .filter(|s| s.featured)
            .cloned()
            .collect();
        studies.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        studies.truncate(limit as usize);
        Ok(studies)
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<Study>, RepoError> {
        let mut studies: Vec<Study> = self.store.read().await.values().cloned().collect();
        studies.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        studies.truncate(limit as usize);
        Ok(studies)
    }

    async fn increment_downloads(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        let study = store.get_mut(&id).ok_or(RepoError::NotFound)?;
        study.download_count += 1;
        Ok(())
    }
}

/// In-memory category repository keyed by slug.
#[derive(Default)]
pub struct InMemoryCategoryRepository {
    store: RwLock<HashMap<String, Category>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        Ok(self.store.read().await.get(slug).cloned())
    }

    async fn create_if_absent(&self, category: Category) -> Result<(), RepoError> {
        // The write lock makes check-then-insert atomic; an existing record
        // keeps its original name.
        self.store
            .write()
            .await
            .entry(category.slug.clone())
            .or_insert(category);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        let mut categories: Vec<Category> = self.store.read().await.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}

/// In-memory user repository.
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        self.store.write().await.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .store
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_and_find_post() {
        let repo = InMemoryPostRepository::new();
        let post = Post::new(
            Uuid::new_v4(),
            "Hola mundo".to_string(),
            "Un extracto suficientemente largo.".to_string(),
            "Contenido con más de veinte caracteres.".to_string(),
            PostStatus::Published,
            "general".to_string(),
            "memory://posts/1_cover.png".to_string(),
        );
        let saved = repo.save(post.clone()).await.unwrap();

        let found = repo.find_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(found.slug, "hola-mundo");

        let published = repo.list_published(10).await.unwrap();
        assert_eq!(published.len(), 1);
    }

    #[tokio::test]
    async fn find_by_slug_prefers_newest() {
        let repo = InMemoryPostRepository::new();
        let make = |title: &str| {
            Post::new(
                Uuid::new_v4(),
                title.to_string(),
                "Un extracto suficientemente largo.".to_string(),
                "Contenido con más de veinte caracteres.".to_string(),
                PostStatus::Draft,
                "general".to_string(),
                "memory://posts/1_cover.png".to_string(),
            )
        };
        let older = repo.save(make("Mismo título")).await.unwrap();
        let newer = {
            let mut p = make("Mismo título");
            p.created_at = older.created_at + chrono::Duration::seconds(5);
            repo.save(p).await.unwrap()
        };

        let found = repo.find_by_slug("mismo-ttulo").await.unwrap().unwrap();
        assert_eq!(found.id, newer.id);
    }

    #[tokio::test]
    async fn find_by_author_includes_drafts() {
        let repo = InMemoryPostRepository::new();
        let author = Uuid::new_v4();
        let post = Post::new(
            author,
            "Borrador privado".to_string(),
            "Un extracto suficientemente largo.".to_string(),
            "Contenido con más de veinte caracteres.".to_string(),
            PostStatus::Draft,
            "general".to_string(),
            "memory://posts/1_cover.png".to_string(),
        );
        repo.save(post).await.unwrap();

        assert_eq!(repo.find_by_author(author).await.unwrap().len(), 1);
        assert!(repo.find_by_author(Uuid::new_v4()).await.unwrap().is_empty());
        assert!(repo.list_published(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn category_upsert_keeps_first_name() {
        let repo = InMemoryCategoryRepository::new();
        repo.create_if_absent(Category::new("Ética en IA".to_string()))
            .await
            .unwrap();
        repo.create_if_absent(Category::new("ética en ia".to_string()))
            .await
            .unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Ética en IA");
    }

    #[tokio::test]
    async fn delete_missing_user_is_not_found() {
        let repo = InMemoryUserRepository::new();
        assert!(matches!(
            repo.delete(Uuid::new_v4()).await,
            Err(RepoError::NotFound)
        ));
    }
}
