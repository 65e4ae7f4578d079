//! Position ↔ subgroup link table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "position_subgroup_links")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub position_id: i32,

    #[sea_orm(primary_key, auto_increment = false)]
    pub subgroup_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::position::Entity",
        from = "Column::PositionId",
        to = "super::position::Column::Id",
        on_delete = "Cascade"
    )]
    Position,

    #[sea_orm(
        belongs_to = "super::subgroup::Entity",
        from = "Column::SubgroupId",
        to = "super::subgroup::Column::Id",
        on_delete = "Cascade"
    )]
    Subgroup,
}

impl Related<super::position::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Position.def()
    }
}

impl Related<super::subgroup::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subgroup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
