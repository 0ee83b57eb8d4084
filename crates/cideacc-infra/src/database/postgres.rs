//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use cideacc_core::domain::{Category, Post, PostStatus, Study, User};
use cideacc_core::error::RepoError;
use cideacc_core::ports::{
    BaseRepository, CategoryRepository, PostRepository, StudyRepository, UserRepository,
};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::study::{self, Entity as StudyEntity};
use super::entity::user::{self, Entity as UserEntity};

/// Mask an email for logging: first character of the local part plus the
/// domain. Char-based, so multi-byte local parts never split mid-character.
pub(super) fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if local.chars().count() > 1 => match local.chars().next() {
            Some(first) => format!("{first}***@{domain}"),
            None => "***".to_string(),
        },
        _ => "***".to_string(),
    }
}

fn query_err(err: DbErr) -> RepoError {
    let message = err.to_string();
    if message.contains("duplicate") || message.contains("unique") {
        RepoError::Constraint(message)
    } else {
        RepoError::Query(message)
    }
}

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.map(Into::into))
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        // Primary keys are assigned in the domain layer, so insert-vs-update
        // is decided by an existence probe rather than by key presence.
        let id = post.id;
        let exists = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?
            .is_some();

        let model: post::ActiveModel = post.into();
        let saved = if exists {
            model.update(&self.db).await
        } else {
            model.insert(&self.db).await
        }
        .map_err(query_err)?;

        Ok(saved.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        // Slugs are not unique; the newest post wins.
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .order_by_desc(post::Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.map(Into::into))
    }

    async fn list_published(&self, limit: u64) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Status.eq(PostStatus::Published.as_str()))
            .order_by_desc(post::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// PostgreSQL study repository.
pub struct PostgresStudyRepository {
    db: DbConn,
}

impl PostgresStudyRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<Study, Uuid> for PostgresStudyRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Study>, RepoError> {
        let result = StudyEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.map(Into::into))
    }

    async fn save(&self, study: Study) -> Result<Study, RepoError> {
        let id = study.id;
        let exists = StudyEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?
            .is_some();

        let model: study::ActiveModel = study.into();
        let saved = if exists {
            model.update(&self.db).await
        } else {
            model.insert(&self.db).await
        }
        .map_err(query_err)?;

        Ok(saved.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = StudyEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl StudyRepository for PostgresStudyRepository {
    async fn list_featured(&self, limit: u64) -> Result<Vec<Study>, RepoError> {
        let result = StudyEntity::find()
            .filter(study::Column::Featured.eq(true))
            .order_by_desc(study::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<Study>, RepoError> {
        let result = StudyEntity::find()
            .order_by_desc(study::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn increment_downloads(&self, id: Uuid) -> Result<(), RepoError> {
        // Single atomic UPDATE, no read-modify-write race between clients.
        let result = StudyEntity::update_many()
            .col_expr(
                study::Column::DownloadCount,
                Expr::col(study::Column::DownloadCount).add(1),
            )
            .filter(study::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

/// PostgreSQL category repository, keyed by slug.
pub struct PostgresCategoryRepository {
    db: DbConn,
}

impl PostgresCategoryRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find_by_id(slug.to_string())
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.map(Into::into))
    }

    async fn create_if_absent(&self, category: Category) -> Result<(), RepoError> {
        let model: category::ActiveModel = category.into();
        let result = CategoryEntity::insert(model)
            .on_conflict(
                OnConflict::column(category::Column::Slug)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.db)
            .await;

        match result {
            Ok(_) => Ok(()),
            // The slug already exists; that is the idempotent success case.
            Err(DbErr::RecordNotInserted) => Ok(()),
            Err(err) => Err(query_err(err)),
        }
    }

    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// PostgreSQL user repository.
pub struct PostgresUserRepository {
    db: DbConn,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.map(Into::into))
    }

    async fn save(&self, entity: User) -> Result<User, RepoError> {
        let id = entity.id;
        let exists = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?
            .is_some();

        let model: user::ActiveModel = entity.into();
        let saved = if exists {
            model.update(&self.db).await
        } else {
            model.insert(&self.db).await
        }
        .map_err(query_err)?;

        Ok(saved.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        // Mask the address before logging to keep PII out of the logs.
        tracing::debug!(user_email = %mask_email(email), "finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.map(Into::into))
    }
}
