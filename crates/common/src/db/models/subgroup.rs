//! Subgroup of positions entity (within a group)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "position_subgroups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub group_id: i32,

    pub name: String,

    pub abbreviation: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::group::Entity",
        from = "Column::GroupId",
        to = "super::group::Column::Id",
        on_delete = "Cascade"
    )]
    Group,

    #[sea_orm(has_many = "super::position_subgroup::Entity")]
    PositionSubgroup,
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::position::Entity> for Entity {
    fn to() -> RelationDef {
        super::position_subgroup::Relation::Position.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::position_subgroup::Relation::Subgroup.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
