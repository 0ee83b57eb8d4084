//! Study entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "studies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub category: String,
    pub author: String,
    pub publish_date: String,
    pub tags: Json,
    pub featured: bool,
    pub pdf_url: String,
    pub thumbnail_url: Option<String>,
    pub download_count: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for cideacc_core::domain::Study {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            category: model.category,
            author: model.author,
            publish_date: model.publish_date,
            tags: serde_json::from_value(model.tags).unwrap_or_default(),
            featured: model.featured,
            pdf_url: model.pdf_url,
            thumbnail_url: model.thumbnail_url,
            download_count: model.download_count,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<cideacc_core::domain::Study> for ActiveModel {
    fn from(study: cideacc_core::domain::Study) -> Self {
        Self {
            id: Set(study.id),
            title: Set(study.title),
            description: Set(study.description),
            category: Set(study.category),
            author: Set(study.author),
            publish_date: Set(study.publish_date),
            tags: Set(serde_json::to_value(&study.tags).unwrap_or_default()),
            featured: Set(study.featured),
            pdf_url: Set(study.pdf_url),
            thumbnail_url: Set(study.thumbnail_url),
            download_count: Set(study.download_count),
            created_at: Set(study.created_at.into()),
            updated_at: Set(study.updated_at.into()),
        }
    }
}
