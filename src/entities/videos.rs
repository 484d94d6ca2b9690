use sea_orm::{entity::prelude::*, sea_query::StringLen};
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    async_graphql::Enum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum VideoSource {
    /// Uploaded by the site owner and served by our own player.
    #[sea_orm(string_value = "hosted")]
    Hosted,
    #[sea_orm(string_value = "youtube")]
    #[graphql(name = "YOUTUBE")]
    YouTube,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "videos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub source: VideoSource,
    /// External id, unique per source.
    #[sea_orm(nullable)]
    pub video_id: Option<String>,
    #[sea_orm(unique, nullable)]
    pub link: Option<String>,
    pub thumbnail_link: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::actualities::Entity")]
    Actualities,
}

impl Related<super::actualities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Actualities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
