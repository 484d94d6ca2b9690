use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "actuality_images")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub actuality_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub photo_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::actualities::Entity",
        from = "Column::ActualityId",
        to = "super::actualities::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Actualities,
    #[sea_orm(
        belongs_to = "super::photos::Entity",
        from = "Column::PhotoId",
        to = "super::photos::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Photos,
}

impl Related<super::actualities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Actualities.def()
    }
}

impl Related<super::photos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Photos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
