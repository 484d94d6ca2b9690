use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::actuality_tags::Entity")]
    ActualityTags,
}

impl Related<super::actuality_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActualityTags.def()
    }
}

impl Related<super::actualities::Entity> for Entity {
    fn to() -> RelationDef {
        super::actuality_tags::Relation::Actualities.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::actuality_tags::Relation::Tags.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
