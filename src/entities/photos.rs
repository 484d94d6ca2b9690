use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "photos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub link: String,
    pub name: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::actuality_images::Entity")]
    ActualityImages,
}

impl Related<super::actuality_images::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActualityImages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
