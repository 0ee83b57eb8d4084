use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Post, Study, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post repository with the queries the blog pages depend on.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Find a post by its slug. Slugs are not guaranteed unique; when several
    /// posts share one, the most recently created wins.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Published posts, newest first.
    async fn list_published(&self, limit: u64) -> Result<Vec<Post>, RepoError>;

    /// All posts by a given author, newest first.
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;
}

/// Category repository keyed by slug.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    /// Insert the category unless one with the same slug already exists.
    ///
    /// Must be an idempotent upsert: concurrent calls for the same slug leave
    /// exactly one record, and an existing record keeps its original `name`.
    async fn create_if_absent(&self, category: Category) -> Result<(), RepoError>;

    async fn list_all(&self) -> Result<Vec<Category>, RepoError>;
}

/// Study repository.
#[async_trait]
pub trait StudyRepository: BaseRepository<Study, Uuid> {
    /// Featured studies, newest first.
    async fn list_featured(&self, limit: u64) -> Result<Vec<Study>, RepoError>;

    /// All studies, newest first.
    async fn list_recent(&self, limit: u64) -> Result<Vec<Study>, RepoError>;

    /// Bump the download counter. Returns `RepoError::NotFound` for unknown ids.
    async fn increment_downloads(&self, id: Uuid) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}
