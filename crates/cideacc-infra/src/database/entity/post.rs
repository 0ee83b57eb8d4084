//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use cideacc_core::domain::PostStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub status: String,
    /// JSON array of category names; the publish path writes exactly one.
    pub categories: Json,
    pub featured_image_url: Option<String>,
    pub views_count: i32,
    pub likes_count: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for cideacc_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            author_id: model.author_id,
            title: model.title,
            slug: model.slug,
            excerpt: model.excerpt,
            content: model.content,
            status: PostStatus::parse(&model.status).unwrap_or(PostStatus::Draft),
            categories: serde_json::from_value(model.categories).unwrap_or_default(),
            featured_image_url: model.featured_image_url,
            views_count: model.views_count,
            likes_count: model.likes_count,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<cideacc_core::domain::Post> for ActiveModel {
    fn from(post: cideacc_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            author_id: Set(post.author_id),
            title: Set(post.title),
            slug: Set(post.slug),
            excerpt: Set(post.excerpt),
            content: Set(post.content),
            status: Set(post.status.as_str().to_string()),
            categories: Set(serde_json::to_value(&post.categories).unwrap_or_default()),
            featured_image_url: Set(post.featured_image_url),
            views_count: Set(post.views_count),
            likes_count: Set(post.likes_count),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}
