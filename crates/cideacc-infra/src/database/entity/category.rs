//! Category entity for SeaORM. The slug is the primary key, which is what
//! makes the existence-check-then-create upsert race-free.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub slug: String,
    pub name: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for cideacc_core::domain::Category {
    fn from(model: Model) -> Self {
        Self {
            slug: model.slug,
            name: model.name,
            created_at: model.created_at.into(),
        }
    }
}

impl From<cideacc_core::domain::Category> for ActiveModel {
    fn from(category: cideacc_core::domain::Category) -> Self {
        Self {
            slug: Set(category.slug),
            name: Set(category.name),
            created_at: Set(category.created_at.into()),
        }
    }
}
