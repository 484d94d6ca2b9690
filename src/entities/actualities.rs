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
pub enum ActualityStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "archived")]
    Archived,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "actualities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub sub_title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub summary: Option<String>,
    #[sea_orm(nullable)]
    pub text: Option<Json>,
    #[sea_orm(unique)]
    pub slug: String,
    pub link: Option<String>,
    pub status: ActualityStatus,
    pub is_pinned: bool,
    pub is_external: bool,
    pub active_since: DateTimeUtc,
    pub active_to: Option<DateTimeUtc>,
    pub cover_photo_id: Option<i32>,
    pub preview_photo_id: Option<i32>,
    pub video_id: Option<i32>,
    pub production_id: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::photos::Entity",
        from = "Column::CoverPhotoId",
        to = "super::photos::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    CoverPhoto,
    #[sea_orm(
        belongs_to = "super::photos::Entity",
        from = "Column::PreviewPhotoId",
        to = "super::photos::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    PreviewPhoto,
    #[sea_orm(
        belongs_to = "super::videos::Entity",
        from = "Column::VideoId",
        to = "super::videos::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Video,
    #[sea_orm(
        belongs_to = "super::productions::Entity",
        from = "Column::ProductionId",
        to = "super::productions::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Production,
    #[sea_orm(has_many = "super::actuality_tags::Entity")]
    ActualityTags,
    #[sea_orm(has_many = "super::actuality_images::Entity")]
    ActualityImages,
}

impl Related<super::videos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Video.def()
    }
}

impl Related<super::productions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Production.def()
    }
}

impl Related<super::actuality_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActualityTags.def()
    }
}

impl Related<super::actuality_images::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActualityImages.def()
    }
}

impl Related<super::tags::Entity> for Entity {
    fn to() -> RelationDef {
        super::actuality_tags::Relation::Tags.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::actuality_tags::Relation::Actualities.def().rev())
    }
}

// Photos reached through the join table are the gallery images; cover and
// preview photos are loaded by id.
impl Related<super::photos::Entity> for Entity {
    fn to() -> RelationDef {
        super::actuality_images::Relation::Photos.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::actuality_images::Relation::Actualities.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
